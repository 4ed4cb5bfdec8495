//! Place records produced by geocoding or rehydrated from a saved list.

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;

/// Coarse classification of a resolved place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceType {
    City,
    River,
}

impl std::fmt::Display for PlaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaceType::City => write!(f, "city"),
            PlaceType::River => write!(f, "river"),
        }
    }
}

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for geo_types::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo_types::Point::new(p.lon, p.lat)
    }
}

/// Where a found place is and what the backend called it.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub display_name: String,
    pub point: GeoPoint,
    pub place_type: Option<PlaceType>,
}

/// Outcome of one geocoding attempt.
///
/// Coordinates and an error are mutually exclusive, so a record is either
/// found with a location or failed with a reason.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceStatus {
    Found(Location),
    Failed(ResolveError),
}

/// One user-supplied name and what became of it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    /// The query exactly as the user typed it (trimmed)
    pub name: String,
    pub status: PlaceStatus,
}

impl PlaceRecord {
    pub fn found(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            status: PlaceStatus::Found(location),
        }
    }

    pub fn failed(name: impl Into<String>, error: ResolveError) -> Self {
        Self {
            name: name.into(),
            status: PlaceStatus::Failed(error),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self.status, PlaceStatus::Found(_))
    }

    pub fn location(&self) -> Option<&Location> {
        match &self.status {
            PlaceStatus::Found(loc) => Some(loc),
            PlaceStatus::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ResolveError> {
        match &self.status {
            PlaceStatus::Found(_) => None,
            PlaceStatus::Failed(err) => Some(err),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.location().map(|l| l.display_name.as_str())
    }

    pub fn point(&self) -> Option<GeoPoint> {
        self.location().map(|l| l.point)
    }

    pub fn lat(&self) -> Option<f64> {
        self.point().map(|p| p.lat)
    }

    pub fn lon(&self) -> Option<f64> {
        self.point().map(|p| p.lon)
    }

    pub fn place_type(&self) -> Option<PlaceType> {
        self.location().and_then(|l| l.place_type)
    }
}
