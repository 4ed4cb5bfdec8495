//! Sequential geocoding against a single configured backend.

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::{google, nominatim};
use crate::config::{BackendKind, GeocoderConfig};
use crate::error::ResolveError;
use crate::models::{Location, PlaceRecord};

/// Request/response dialect of the geocoding service
#[derive(Debug, Clone)]
pub enum Backend {
    Google { api_key: String },
    Nominatim,
}

/// Progress of a batch, reported before and after each lookup
#[derive(Debug)]
pub enum Progress<'a> {
    Started {
        index: usize,
        total: usize,
        name: &'a str,
    },
    Resolved {
        index: usize,
        total: usize,
        record: &'a PlaceRecord,
    },
}

/// Resolves place names to locations, one request at a time
pub struct GeocodingClient {
    client: Client,
    backend: Backend,
    endpoint: Url,
    throttle: Duration,
}

impl GeocodingClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let backend = match config.backend {
            BackendKind::Google => Backend::Google {
                api_key: config
                    .api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
                    .context("Google geocoding requires an API key")?,
            },
            BackendKind::Nominatim => Backend::Nominatim,
        };
        let endpoint = Url::parse(config.endpoint())
            .with_context(|| format!("Invalid geocoder endpoint '{}'", config.endpoint()))?;
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            backend,
            endpoint,
            throttle: config.throttle(),
        })
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Resolve a single name. Failures are captured in the record.
    pub async fn resolve(&self, name: &str) -> PlaceRecord {
        match self.lookup(name).await {
            Ok(location) => {
                debug!(
                    "Resolved '{}' to {} ({}, {})",
                    name, location.display_name, location.point.lat, location.point.lon
                );
                PlaceRecord::found(name, location)
            }
            Err(err) => {
                warn!("Could not resolve '{}': {}", name, err);
                PlaceRecord::failed(name, err)
            }
        }
    }

    async fn lookup(&self, name: &str) -> Result<Location, ResolveError> {
        let url = match &self.backend {
            Backend::Google { api_key } => google::request_url(&self.endpoint, name, api_key),
            Backend::Nominatim => nominatim::request_url(&self.endpoint, name),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ResolveError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Http(status.as_u16()));
        }

        match &self.backend {
            Backend::Google { .. } => {
                let body = response.json().await.map_err(ResolveError::from_reqwest)?;
                google::interpret(body)
            }
            Backend::Nominatim => {
                let body = response.json().await.map_err(ResolveError::from_reqwest)?;
                nominatim::interpret(body)
            }
        }
    }

    /// Resolve every name in order, strictly one after another.
    ///
    /// The output has one record per input name at the same position.
    /// `on_progress` sees each record as soon as it is resolved.
    pub async fn resolve_all<F>(&self, names: &[String], mut on_progress: F) -> Vec<PlaceRecord>
    where
        F: FnMut(Progress<'_>),
    {
        let total = names.len();
        let mut records = Vec::with_capacity(total);

        info!("Geocoding {} places", total);

        for (index, name) in names.iter().enumerate() {
            if index > 0 && !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }

            on_progress(Progress::Started { index, total, name });
            let record = self.resolve(name).await;
            on_progress(Progress::Resolved {
                index,
                total,
                record: &record,
            });
            records.push(record);
        }

        let found = records.iter().filter(|r| r.is_found()).count();
        info!("Geocoding complete: {} of {} found", found, total);

        records
    }
}
