//! Google Geocoding API response handling.

use serde::Deserialize;
use url::Url;

use super::classify;
use crate::error::ResolveError;
use crate::models::{GeoPoint, Location};

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

pub(crate) fn request_url(endpoint: &Url, name: &str, api_key: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("address", name)
        .append_pair("key", api_key);
    url
}

/// Pick the first result, or map the envelope status to an error.
pub(crate) fn interpret(response: GeocodeResponse) -> Result<Location, ResolveError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(ResolveError::NotFound),
        other => return Err(ResolveError::Api(other.to_string())),
    }

    let result = response
        .results
        .into_iter()
        .next()
        .ok_or(ResolveError::NotFound)?;

    // Rivers come back as natural_feature; the name is the only further hint.
    let mut hints: Vec<&str> = result.types.iter().map(String::as_str).collect();
    if hints.contains(&"natural_feature") {
        hints.extend(result.formatted_address.split(|c: char| !c.is_alphanumeric()));
    }

    let place_type = classify(hints);

    Ok(Location {
        place_type: Some(place_type),
        display_name: result.formatted_address,
        point: GeoPoint::new(result.geometry.location.lat, result.geometry.location.lng),
    })
}
