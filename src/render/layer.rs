use tracing::debug;

use super::{MapRenderer, MarkerId, Viewport};
use crate::models::{GeoPoint, PlaceRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub title: String,
    pub point: GeoPoint,
    pub visible: bool,
    pub label_visible: bool,
}

/// In-memory marker layer
#[derive(Debug, Default)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
    viewport: Viewport,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn visible_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| m.visible)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

impl MapRenderer for MarkerLayer {
    fn add_marker(&mut self, id: MarkerId, place: &PlaceRecord) {
        let Some(point) = place.point() else {
            return;
        };
        // Re-adding an id replaces the old marker instead of stacking a second one
        self.markers.retain(|m| m.id != id);
        self.markers.push(Marker {
            id,
            title: place.name.clone(),
            point,
            visible: true,
            label_visible: false,
        });
        debug!("Marker {} at ({}, {}) for '{}'", id, point.lat, point.lon, place.name);
    }

    fn remove_all(&mut self) {
        debug!("Removing {} markers", self.markers.len());
        self.markers.clear();
        self.viewport = Viewport::world();
    }

    fn fit_bounds(&mut self, points: &[GeoPoint]) {
        self.viewport = Viewport::fit(points);
    }

    fn show_only(&mut self, id: MarkerId) {
        for marker in &mut self.markers {
            marker.visible = marker.id == id;
        }
    }

    fn show_all(&mut self) {
        for marker in &mut self.markers {
            marker.visible = true;
        }
    }

    fn hide_labels(&mut self) {
        for marker in &mut self.markers {
            marker.label_visible = false;
        }
    }

    fn toggle_label(&mut self, id: MarkerId) -> bool {
        let mut shown = false;
        for marker in &mut self.markers {
            if marker.id == id {
                marker.label_visible = !marker.label_visible;
                shown = marker.label_visible;
            } else {
                marker.label_visible = false;
            }
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;
    use crate::models::Location;

    fn place(name: &str, lat: f64, lon: f64) -> PlaceRecord {
        PlaceRecord::found(
            name,
            Location {
                display_name: name.to_string(),
                point: GeoPoint::new(lat, lon),
                place_type: None,
            },
        )
    }

    #[test]
    fn test_failed_records_get_no_marker() {
        let mut layer = MarkerLayer::new();
        layer.add_marker(MarkerId(0), &PlaceRecord::failed("Atlantis", ResolveError::NotFound));
        assert!(layer.markers().is_empty());
    }

    #[test]
    fn test_remove_all_resets_view() {
        let mut layer = MarkerLayer::new();
        layer.add_marker(MarkerId(0), &place("Paris", 48.85, 2.35));
        layer.fit_bounds(&[GeoPoint::new(48.85, 2.35)]);
        layer.remove_all();
        layer.remove_all();

        assert!(layer.markers().is_empty());
        assert_eq!(layer.viewport(), &Viewport::world());
    }

    #[test]
    fn test_show_only_then_show_all() {
        let mut layer = MarkerLayer::new();
        layer.add_marker(MarkerId(0), &place("Paris", 48.85, 2.35));
        layer.add_marker(MarkerId(1), &place("Rome", 41.9, 12.5));

        layer.show_only(MarkerId(1));
        let visible: Vec<MarkerId> = layer.visible_markers().map(|m| m.id).collect();
        assert_eq!(visible, vec![MarkerId(1)]);

        layer.show_all();
        assert_eq!(layer.visible_markers().count(), 2);
    }

    #[test]
    fn test_toggle_label_hides_others() {
        let mut layer = MarkerLayer::new();
        layer.add_marker(MarkerId(0), &place("Paris", 48.85, 2.35));
        layer.add_marker(MarkerId(1), &place("Rome", 41.9, 12.5));

        assert!(layer.toggle_label(MarkerId(0)));
        assert!(layer.toggle_label(MarkerId(1)));
        assert!(!layer.marker(MarkerId(0)).unwrap().label_visible);
        assert!(!layer.toggle_label(MarkerId(1)));

        layer.toggle_label(MarkerId(0));
        layer.hide_labels();
        assert!(layer.markers().iter().all(|m| !m.label_visible));
    }
}
