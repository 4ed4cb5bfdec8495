//! Ordered list of place records for the current session.

use crate::models::{GeoPoint, PlaceRecord};
use crate::render::{MapRenderer, MarkerId};

#[derive(Debug, Default)]
pub struct PlaceStore {
    records: Vec<PlaceRecord>,
}

impl PlaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next appended record will get.
    pub fn next_id(&self) -> MarkerId {
        MarkerId(self.records.len())
    }

    /// Append in arrival order. Existing entries are untouched.
    pub fn append(&mut self, records: impl IntoIterator<Item = PlaceRecord>) {
        self.records.extend(records);
    }

    /// Empty the store and make the renderer drop every marker it holds.
    pub fn clear(&mut self, renderer: &mut dyn MapRenderer) {
        self.records.clear();
        renderer.remove_all();
    }

    pub fn records(&self) -> &[PlaceRecord] {
        &self.records
    }

    pub fn get(&self, id: MarkerId) -> Option<&PlaceRecord> {
        self.records.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn found_subset(&self) -> Vec<&PlaceRecord> {
        self.records.iter().filter(|r| r.is_found()).collect()
    }

    /// Found records together with their marker ids.
    pub fn found_entries(&self) -> Vec<(MarkerId, &PlaceRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_found())
            .map(|(i, r)| (MarkerId(i), r))
            .collect()
    }

    pub fn found_points(&self) -> Vec<GeoPoint> {
        self.records.iter().filter_map(PlaceRecord::point).collect()
    }

    pub fn found_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_found()).count()
    }

    /// "N of M found"
    pub fn summary(&self) -> String {
        format!("{} of {} found", self.found_count(), self.len())
    }
}
