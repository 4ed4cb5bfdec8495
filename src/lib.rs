//! Topo - geocode a list of place names, pin them on a map, share the list,
//! and quiz yourself on where everything is.
//!
//! This library provides the session and its components for the `topo` binary.

pub mod config;
pub mod error;
pub mod geocoder;
pub mod input;
pub mod models;
pub mod persistence;
pub mod quiz;
pub mod render;
pub mod session;
pub mod store;

pub use config::Config;
pub use error::{Error, InputError, PersistError, QuizError, ResolveError};
pub use models::{GeoPoint, ListPayload, PlaceRecord, PlaceType};
pub use session::{Command, Outcome, Session};
