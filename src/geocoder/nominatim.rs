//! Nominatim search API response handling.

use serde::Deserialize;
use url::Url;

use super::classify;
use crate::error::ResolveError;
use crate::models::{GeoPoint, Location};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    display_name: String,
    lat: String,
    lon: String,
    /// `category` in jsonv2, `class` in the older json format
    #[serde(default, alias = "class")]
    category: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    addresstype: Option<String>,
}

pub(crate) fn request_url(endpoint: &Url, name: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("q", name)
        .append_pair("format", "jsonv2")
        .append_pair("limit", "1");
    url
}

/// Finite decimal degrees; rejects "NaN" and "inf", which `f64` would accept.
fn coordinate(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn interpret(results: Vec<SearchResult>) -> Result<Location, ResolveError> {
    let result = results.into_iter().next().ok_or(ResolveError::NotFound)?;

    let lat = coordinate(&result.lat)
        .ok_or_else(|| ResolveError::Api(format!("invalid latitude '{}'", result.lat)))?;
    let lon = coordinate(&result.lon)
        .ok_or_else(|| ResolveError::Api(format!("invalid longitude '{}'", result.lon)))?;

    let place_type = classify(
        [&result.category, &result.kind, &result.addresstype]
            .into_iter()
            .flatten()
            .map(String::as_str),
    );

    Ok(Location {
        display_name: result.display_name,
        point: GeoPoint::new(lat, lon),
        place_type: Some(place_type),
    })
}
