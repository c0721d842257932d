//! The observable state of one trip search.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::domain::{Coordinate, RouteOption};
use crate::places::Place;

/// Everything the UI renders about the current search.
///
/// Replaced wholesale on every change; readers get a consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSearchState {
    /// Bumped whenever the destination changes or the search is cleared.
    pub generation: u64,
    pub current_location: Option<Coordinate>,
    pub current_location_label: Option<String>,
    pub destination_name: Option<String>,
    pub destination_coords: Option<Coordinate>,
    pub active_options: Vec<RouteOption>,
    pub loading: bool,
    pub query: String,
    pub suggestions: Vec<Place>,
}

impl TripSearchState {
    /// Origin and destination, when both are known.
    pub fn endpoints(&self) -> Option<(Coordinate, Coordinate)> {
        Some((self.current_location?, self.destination_coords?))
    }
}

/// Shared handle to a [`TripSearchState`].
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Debug, Clone)]
pub struct TripStore {
    inner: Arc<watch::Sender<TripSearchState>>,
}

impl TripStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(TripSearchState::default());
        Self { inner: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> TripSearchState {
        self.inner.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TripSearchState> {
        self.inner.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Replace the state unconditionally.
    pub fn update(&self, f: impl FnOnce(&TripSearchState) -> TripSearchState) {
        self.inner.send_modify(|state| *state = f(state));
    }

    /// Mutate the state if `f` returns true; subscribers are only woken then.
    pub fn update_if(&self, f: impl FnOnce(&mut TripSearchState) -> bool) -> bool {
        self.inner.send_if_modified(f)
    }

    /// Start a new search, returning its generation.
    pub fn begin_search(&self, destination: &Place) -> u64 {
        let mut generation = 0;
        self.inner.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.destination_name = Some(destination.name.clone());
            state.destination_coords = Some(destination.coordinate);
            state.active_options = Vec::new();
            state.loading = state.current_location.is_some();
            state.query = String::new();
            state.suggestions = Vec::new();
        });
        generation
    }

    /// Install search results if `generation` is still current.
    pub fn deliver(&self, generation: u64, options: Vec<RouteOption>) -> bool {
        self.inner.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            state.active_options = options;
            state.loading = false;
            true
        })
    }

    /// Swap in re-evaluated options if `generation` is still current.
    pub fn replace_options(&self, generation: u64, options: Vec<RouteOption>) -> bool {
        self.inner.send_if_modified(|state| {
            if state.generation != generation || state.active_options.is_empty() {
                return false;
            }
            state.active_options = options;
            true
        })
    }

    /// Drop the destination and options, returning the new generation.
    pub fn clear(&self) -> u64 {
        let mut generation = 0;
        self.inner.send_modify(|state| {
            state.generation += 1;
            generation = state.generation;
            state.destination_name = None;
            state.destination_coords = None;
            state.active_options = Vec::new();
            state.loading = false;
        });
        generation
    }
}

impl Default for TripStore {
    fn default() -> Self {
        Self::new()
    }
}
