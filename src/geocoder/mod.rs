//! Geocoding client and backend response handling.

mod client;
mod google;
mod nominatim;

pub use client::{Backend, GeocodingClient, Progress};

use crate::models::PlaceType;

/// Feature tags that mark a waterway
const RIVER_TAGS: &[&str] = &["waterway", "river", "stream", "canal", "riverbank"];

/// Words in a natural feature's name that suggest a river
const RIVER_WORDS: &[&str] = &["rivier", "fluss", "rivière", "riviere", "rio", "río", "rhine", "rijn"];

/// Best-effort classification from backend feature hints.
///
/// Anything not recognisably a waterway is a city.
pub fn classify<'a>(hints: impl IntoIterator<Item = &'a str>) -> PlaceType {
    let is_river = hints.into_iter().any(|hint| {
        let hint = hint.to_lowercase();
        RIVER_TAGS.contains(&hint.as_str()) || RIVER_WORDS.contains(&hint.as_str())
    });
    if is_river {
        PlaceType::River
    } else {
        PlaceType::City
    }
}
