use anyhow::{Context, Result};
use reqwest::header::HeaderValue;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info};
use url::Url;

use crate::config::StorageConfig;
use crate::error::PersistError;
use crate::models::{ListPayload, PlaceRecord};

const ACCESS_KEY_HEADER: &str = "X-Access-Key";
const BIN_NAME_HEADER: &str = "X-Bin-Name";
const COLLECTION_HEADER: &str = "X-Collection-Id";

/// A list that was stored successfully
#[derive(Debug, Clone, PartialEq)]
pub struct SavedList {
    pub id: String,
    pub share_url: Url,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    metadata: CreateMetadata,
}

#[derive(Debug, Deserialize)]
struct CreateMetadata {
    id: String,
}

/// Client for the hosted JSON blob store
pub struct ListClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    collection_id: Option<String>,
    share_base_url: Url,
    share_param: String,
}

impl ListClient {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid storage base URL '{}'", config.base_url))?;
        let share_base_url = Url::parse(&config.share_base_url)
            .with_context(|| format!("Invalid share URL '{}'", config.share_base_url))?;
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key().map(String::from),
            collection_id: config.collection_id.clone(),
            share_base_url,
            share_param: config.share_param.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn share_param(&self) -> &str {
        &self.share_param
    }

    fn api_key(&self) -> Result<&str, PersistError> {
        self.api_key.as_deref().ok_or(PersistError::NotConfigured)
    }

    /// `{base}/b` or `{base}/b/{id}`
    fn bin_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("b");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Page URL with the list id as a query parameter.
    pub fn share_url(&self, id: &str) -> Url {
        let mut url = self.share_base_url.clone();
        url.query_pairs_mut().append_pair(&self.share_param, id);
        url
    }

    /// Store the found places under `name`. Failed records are skipped.
    ///
    /// Validation happens before any network traffic: an empty name, a
    /// missing credential or an empty list never reach the backend.
    pub async fn save(&self, name: &str, places: &[&PlaceRecord]) -> Result<SavedList, PersistError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PersistError::EmptyListName);
        }
        let api_key = self.api_key()?;

        let payload = ListPayload::new(name, places);
        if payload.places.is_empty() {
            return Err(PersistError::NothingToSave);
        }
        let count = payload.places.len();

        let mut request = self
            .client
            .post(self.bin_url(None))
            .header(ACCESS_KEY_HEADER, api_key)
            .json(&payload);
        // The bin name is cosmetic; names that are not valid header text are left off
        if let Ok(bin_name) = HeaderValue::from_str(name) {
            request = request.header(BIN_NAME_HEADER, bin_name);
        }
        if let Some(collection) = &self.collection_id {
            request = request.header(COLLECTION_HEADER, collection);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(status, &body);
            error!("Failed to save list '{}': {}", name, message);
            return Err(PersistError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateResponse = response.json().await?;
        let share_url = self.share_url(&created.metadata.id);
        info!("Saved list '{}' ({} places) as {}", name, count, created.metadata.id);
        info!("Share URL: {}", share_url);

        Ok(SavedList {
            id: created.metadata.id,
            share_url,
            count,
        })
    }

    /// Fetch and normalize a stored list.
    pub async fn load(&self, id: &str) -> Result<ListPayload, PersistError> {
        let api_key = self.api_key()?;
        let id = id.trim();
        if id.is_empty() {
            return Err(PersistError::NotFound);
        }

        debug!("Loading list {}", id);
        let response = self
            .client
            .get(self.bin_url(Some(id)))
            .header(ACCESS_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PersistError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersistError::Http {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| PersistError::InvalidPayload(e.to_string()))?;
        let record = match body {
            Value::Object(mut envelope) => envelope
                .remove("record")
                .ok_or_else(|| PersistError::InvalidPayload("response has no record".into()))?,
            _ => return Err(PersistError::InvalidPayload("response is not an object".into())),
        };

        let payload = ListPayload::decode(record)?;
        info!("Loaded list '{}' with {} places", payload.display_name(), payload.places.len());
        Ok(payload)
    }
}

/// The backend's `message` field, or a generic status line.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()))
}

/// Pull a list id out of a shared page URL.
pub fn list_id_from_url(url: &str, param: &str) -> Option<String> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
