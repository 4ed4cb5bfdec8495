//! Saving and loading place lists in a hosted JSON blob store.

mod client;

pub use client::{list_id_from_url, ListClient, SavedList};
