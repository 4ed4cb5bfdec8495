//! Persisted list documents.
//!
//! Lists saved by older releases store the collection under `cities`; current
//! releases write `places`. [`ListPayload::decode`] accepts both and produces a
//! single canonical shape, so nothing downstream ever sees the legacy layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::place::{GeoPoint, Location, PlaceRecord, PlaceType};
use crate::error::PersistError;

/// One successfully resolved place as stored in a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlace {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_type: Option<PlaceType>,
}

impl SavedPlace {
    /// Snapshot a found record. Returns `None` for failed records.
    pub fn from_record(record: &PlaceRecord) -> Option<Self> {
        let loc = record.location()?;
        Some(Self {
            name: record.name.clone(),
            display_name: Some(loc.display_name.clone()),
            lat: loc.point.lat,
            lon: loc.point.lon,
            place_type: loc.place_type,
        })
    }

    /// Rehydrate as a found record. Saved lists only ever hold found places.
    pub fn into_record(self) -> PlaceRecord {
        let display_name = self.display_name.unwrap_or_else(|| self.name.clone());
        PlaceRecord::found(
            self.name,
            Location {
                display_name,
                point: GeoPoint::new(self.lat, self.lon),
                place_type: self.place_type,
            },
        )
    }
}

/// Canonical list document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub places: Vec<SavedPlace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Which field the collection was found under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Current,
    Legacy,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    places: Option<Value>,
    #[serde(default)]
    cities: Option<Value>,
    #[serde(default)]
    saved_at: Option<String>,
    #[serde(default)]
    count: Option<usize>,
}

impl ListPayload {
    /// Build a payload for saving, stamped with the current time.
    pub fn new(name: &str, records: &[&PlaceRecord]) -> Self {
        let places: Vec<SavedPlace> = records
            .iter()
            .filter_map(|r| SavedPlace::from_record(r))
            .collect();
        Self {
            name: Some(name.to_string()),
            count: Some(places.len()),
            places,
            saved_at: Some(Utc::now()),
        }
    }

    /// Normalize a stored document into the canonical shape.
    pub fn decode(value: Value) -> Result<Self, PersistError> {
        if !value.is_object() {
            return Err(PersistError::InvalidPayload("expected a JSON object".into()));
        }
        let raw: RawPayload = serde_json::from_value(value)
            .map_err(|e| PersistError::InvalidPayload(e.to_string()))?;

        let (shape, collection) = match (raw.places, raw.cities) {
            (Some(places), _) if !places.is_null() => (Shape::Current, places),
            (_, Some(cities)) if !cities.is_null() => (Shape::Legacy, cities),
            _ => {
                return Err(PersistError::InvalidPayload(
                    "no place collection in list".into(),
                ))
            }
        };
        if !collection.is_array() {
            return Err(PersistError::InvalidPayload(
                "place collection is not a list".into(),
            ));
        }
        let places: Vec<SavedPlace> = serde_json::from_value(collection)
            .map_err(|e| PersistError::InvalidPayload(e.to_string()))?;

        debug!("Decoded {:?} list payload with {} places", shape, places.len());

        Ok(Self {
            name: raw.name,
            places,
            saved_at: raw
                .saved_at
                .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
                .map(|d| d.with_timezone(&Utc)),
            count: raw.count,
        })
    }

    /// Name to show for the list
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub fn into_records(self) -> Vec<PlaceRecord> {
        self.places.into_iter().map(SavedPlace::into_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use serde_json::json;

    fn paris() -> PlaceRecord {
        PlaceRecord::found(
            "Paris",
            Location {
                display_name: "Paris, France".into(),
                point: GeoPoint::new(48.8566, 2.3522),
                place_type: Some(PlaceType::City),
            },
        )
    }

    #[test]
    fn test_new_skips_failed_records() {
        let found = paris();
        let failed = PlaceRecord::failed("Atlantis", ResolveError::NotFound);
        let payload = ListPayload::new("Trip", &[&found, &failed]);

        assert_eq!(payload.places.len(), 1);
        assert_eq!(payload.count, Some(1));
        assert_eq!(payload.name.as_deref(), Some("Trip"));
    }

    #[test]
    fn test_serialized_shape_uses_current_field_names() {
        let payload = ListPayload::new("Trip", &[&paris()]);
        let value = serde_json::to_value(&payload).unwrap();

        assert!(value.get("places").is_some());
        assert!(value.get("cities").is_none());
        assert!(value.get("savedAt").is_some());
        assert_eq!(value["count"], 1);
        assert_eq!(value["places"][0]["displayName"], "Paris, France");
        assert_eq!(value["places"][0]["placeType"], "city");
    }

    #[test]
    fn test_decode_legacy_cities() {
        let value = json!({
            "name": "Old list",
            "cities": [{"name": "Gent", "displayName": "Gent, Belgium", "lat": 51.05, "lon": 3.72}],
            "savedAt": "2024-01-10T12:00:00.000Z",
            "count": 1
        });

        let payload = ListPayload::decode(value).unwrap();
        assert_eq!(payload.places.len(), 1);
        assert_eq!(payload.places[0].name, "Gent");
        assert_eq!(payload.places[0].place_type, None);
        assert!(payload.saved_at.is_some());
    }

    #[test]
    fn test_decode_prefers_places_over_cities() {
        let value = json!({
            "places": [{"name": "New", "displayName": "New", "lat": 1.0, "lon": 2.0}],
            "cities": [{"name": "Old", "displayName": "Old", "lat": 3.0, "lon": 4.0}]
        });

        let payload = ListPayload::decode(value).unwrap();
        assert_eq!(payload.places.len(), 1);
        assert_eq!(payload.places[0].name, "New");
    }

    #[test]
    fn test_decode_without_collection_is_invalid() {
        let value = json!({"name": "Broken", "count": 3});
        assert!(matches!(
            ListPayload::decode(value),
            Err(PersistError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_decode_non_array_collection_is_invalid() {
        let value = json!({"places": {"name": "Paris"}});
        assert!(matches!(
            ListPayload::decode(value),
            Err(PersistError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_into_records_marks_everything_found() {
        let payload = ListPayload::new("Trip", &[&paris()]);
        let records = payload.into_records();
        assert_eq!(records, vec![paris()]);
    }

    #[test]
    fn test_missing_display_name_falls_back_to_name() {
        let value = json!({"cities": [{"name": "Gent", "lat": 51.05, "lon": 3.72}]});
        let record = ListPayload::decode(value).unwrap().into_records().remove(0);
        assert_eq!(record.display_name(), Some("Gent"));
    }

    #[test]
    fn test_display_name_defaults_to_unknown() {
        let payload = ListPayload::decode(json!({"places": []})).unwrap();
        assert_eq!(payload.display_name(), "Unknown");
    }
}
