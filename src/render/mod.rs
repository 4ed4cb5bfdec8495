//! Map rendering seam.
//!
//! The map SDK itself is external. [`MapRenderer`] is everything the rest of
//! the crate asks of it; [`MarkerLayer`] is a headless implementation that
//! keeps marker state in memory and is what the CLI draws from.

mod layer;
mod viewport;

pub use layer::{Marker, MarkerLayer};
pub use viewport::{Viewport, SINGLE_PLACE_ZOOM, WORLD_CENTER, WORLD_ZOOM};

use crate::models::{GeoPoint, PlaceRecord};

/// Handle for a marker: the position of its record in the place store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait MapRenderer {
    /// Place a marker (with a hidden label) for a found record.
    /// Records without a location are ignored.
    fn add_marker(&mut self, id: MarkerId, place: &PlaceRecord);

    /// Drop every marker and label and return to the world view.
    fn remove_all(&mut self);

    fn fit_bounds(&mut self, points: &[GeoPoint]);

    /// Hide every marker except `id`.
    fn show_only(&mut self, id: MarkerId);

    fn show_all(&mut self);

    fn hide_labels(&mut self);

    /// Toggle one label, hiding all others. Returns whether it is now visible.
    fn toggle_label(&mut self, id: MarkerId) -> bool;
}
