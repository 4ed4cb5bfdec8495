//! Core data models for place lists.

pub mod payload;
pub mod place;

pub use payload::{ListPayload, SavedPlace};
pub use place::{GeoPoint, Location, PlaceRecord, PlaceStatus, PlaceType};
