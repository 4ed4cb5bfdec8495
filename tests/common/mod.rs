//! In-process fake geocoding and blob storage backends.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use topo::config::{BackendKind, GeocoderConfig, StorageConfig};

pub const ACCESS_KEY: &str = "secret";

#[derive(Default)]
pub struct FakeState {
    pub queries: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub bins: Mutex<HashMap<String, Value>>,
    /// (X-Bin-Name, X-Collection-Id) per create request
    pub create_headers: Mutex<Vec<(Option<String>, Option<String>)>>,
    pub storage_hits: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeState {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn storage_hits(&self) -> usize {
        self.storage_hits.load(Ordering::SeqCst)
    }

    pub fn insert_bin(&self, id: &str, record: Value) {
        self.bins.lock().unwrap().insert(id.to_string(), record);
    }
}

pub struct FakeBackend {
    pub url: String,
    pub state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .route("/geocode/json", get(google))
            .route("/search", get(nominatim))
            .route("/v3/b", post(create_bin))
            .route("/v3/b/{id}", get(read_bin))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn google_config(&self) -> GeocoderConfig {
        GeocoderConfig {
            backend: BackendKind::Google,
            api_key: Some("test-key".into()),
            endpoint: Some(format!("{}/geocode/json", self.url)),
            timeout_secs: 1,
            throttle_ms: Some(0),
            ..Default::default()
        }
    }

    pub fn nominatim_config(&self, throttle_ms: u64) -> GeocoderConfig {
        GeocoderConfig {
            backend: BackendKind::Nominatim,
            endpoint: Some(format!("{}/search", self.url)),
            timeout_secs: 1,
            throttle_ms: Some(throttle_ms),
            ..Default::default()
        }
    }

    pub fn storage_config(&self, api_key: Option<&str>) -> StorageConfig {
        StorageConfig {
            api_key: api_key.map(String::from),
            base_url: format!("{}/v3", self.url),
            collection_id: Some("collection-1".into()),
            share_base_url: "https://maps.example.com/topo/".into(),
            ..Default::default()
        }
    }
}

const CITY: &[&str] = &["locality", "political"];
const FEATURE: &[&str] = &["natural_feature"];

/// (display name, lat, lon, google types)
fn known_place(name: &str) -> Option<(&'static str, f64, f64, &'static [&'static str])> {
    let place = match name {
        "Paris" => ("Paris, France", 48.8566, 2.3522, CITY),
        "London" => ("London, UK", 51.5074, -0.1278, CITY),
        "Berlin" => ("Berlin, Germany", 52.52, 13.405, CITY),
        "Rome" => ("Rome, Italy", 41.9028, 12.4964, CITY),
        "Madrid" => ("Madrid, Spain", 40.4168, -3.7038, CITY),
        "Rhine" => ("Rhine River", 51.84, 6.1, FEATURE),
        _ => return None,
    };
    Some(place)
}

/// Tracks concurrent requests and applies the special test names.
async fn enter(state: &FakeState, name: &str) -> Option<Response> {
    state.queries.lock().unwrap().push(name.to_string());
    let now = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_in_flight.fetch_max(now, Ordering::SeqCst);

    let delay = if name == "Slow" {
        Duration::from_secs(3)
    } else {
        Duration::from_millis(20)
    };
    tokio::time::sleep(delay).await;
    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    match name {
        "Boom" => Some((StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()),
        _ => None,
    }
}

async fn google(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let name = params.get("address").cloned().unwrap_or_default();
    if params.get("key").map(String::as_str) != Some("test-key") {
        return Json(json!({"status": "REQUEST_DENIED", "results": []})).into_response();
    }
    if let Some(response) = enter(&state, &name).await {
        return response;
    }
    if name == "Denied" {
        return Json(json!({"status": "OVER_QUERY_LIMIT", "results": []})).into_response();
    }

    match known_place(&name) {
        Some((display, lat, lng, types)) => Json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": display,
                "geometry": {"location": {"lat": lat, "lng": lng}},
                "types": types
            }]
        }))
        .into_response(),
        None => Json(json!({"status": "ZERO_RESULTS", "results": []})).into_response(),
    }
}

async fn nominatim(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let name = params.get("q").cloned().unwrap_or_default();
    if let Some(response) = enter(&state, &name).await {
        return response;
    }

    if name == "Maas" {
        return Json(json!([{
            "display_name": "Maas, Nederland",
            "lat": "51.7",
            "lon": "5.3",
            "category": "waterway",
            "type": "river",
            "addresstype": "river"
        }]))
        .into_response();
    }
    match known_place(&name) {
        Some((display, lat, lon, _)) => Json(json!([{
            "display_name": display,
            "lat": lat.to_string(),
            "lon": lon.to_string(),
            "category": "boundary",
            "type": "administrative",
            "addresstype": "city"
        }]))
        .into_response(),
        None => Json(json!([])).into_response(),
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("x-access-key")
        .and_then(|v| v.to_str().ok())
        == Some(ACCESS_KEY)
}

async fn create_bin(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.storage_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid X-Access-Key provided"})),
        )
            .into_response();
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    state
        .create_headers
        .lock()
        .unwrap()
        .push((header("x-bin-name"), header("x-collection-id")));

    let id = format!("bin-{}", state.next_id.fetch_add(1, Ordering::SeqCst) + 1);
    state.insert_bin(&id, body.clone());
    Json(json!({
        "record": body,
        "metadata": {"id": id, "private": true}
    }))
    .into_response()
}

async fn read_bin(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.storage_hits.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid X-Access-Key provided"})),
        )
            .into_response();
    }

    match state.bins.lock().unwrap().get(&id) {
        Some(record) => Json(json!({
            "record": record,
            "metadata": {"id": id, "private": true}
        }))
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Bin not found or it doesn't belong to your account"})),
        )
            .into_response(),
    }
}
