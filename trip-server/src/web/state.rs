//! Application state for the web layer.

use crate::geocode::{CachedGeocoder, NominatimClient};
use crate::session::TripSession;

/// The session type the server runs with.
pub type LiveSession = TripSession<CachedGeocoder<NominatimClient>>;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// The trip session shared by all requests
    pub session: LiveSession,
}

impl AppState {
    pub fn new(session: LiveSession) -> Self {
        Self { session }
    }
}
