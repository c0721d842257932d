//! Geocoding adapter.
//!
//! Reverse geocoding turns the device coordinate into a short label;
//! forward search complements the built-in destination catalog. Both are
//! best-effort: callers use [`place_label`] and [`place_suggestions`],
//! which never fail.

mod cache;
mod client;
mod error;

use std::future::Future;

use tracing::warn;

pub use cache::{CacheConfig, CachedGeocoder};
pub use client::{GeocoderConfig, NominatimClient};
pub use error::GeocodeError;

use crate::domain::Coordinate;
use crate::places::Place;

/// Label shown when reverse geocoding fails.
pub const FALLBACK_LABEL: &str = "Current Location";

/// A reverse and forward geocoding service.
///
/// This abstraction allows the session to be tested without network access.
pub trait Geocoder: Send + Sync {
    /// Short human-readable name for a coordinate.
    fn reverse_geocode(
        &self,
        at: Coordinate,
    ) -> impl Future<Output = Result<String, GeocodeError>> + Send;

    /// Places matching free text, best match first.
    fn search_places(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Place>, GeocodeError>> + Send;
}

/// Reverse geocode, falling back to [`FALLBACK_LABEL`].
pub async fn place_label<G: Geocoder>(geocoder: &G, at: Coordinate) -> String {
    match geocoder.reverse_geocode(at).await {
        Ok(label) => label,
        Err(e) => {
            warn!(%at, error = %e, "Reverse geocoding failed, using fallback label");
            FALLBACK_LABEL.to_string()
        }
    }
}

/// Forward search, falling back to no results.
pub async fn place_suggestions<G: Geocoder>(
    geocoder: &G,
    query: &str,
    limit: usize,
) -> Vec<Place> {
    match geocoder.search_places(query, limit).await {
        Ok(places) => places,
        Err(e) => {
            warn!(query, error = %e, "Place search failed");
            Vec::new()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{FailingGeocoder, StaticGeocoder};
    use super::*;

    fn fort() -> Coordinate {
        Coordinate::new(6.9344, 79.8441).unwrap()
    }

    #[tokio::test]
    async fn label_from_geocoder() {
        assert_eq!(place_label(&StaticGeocoder::new("Fort"), fort()).await, "Fort");
    }

    #[tokio::test]
    async fn label_falls_back() {
        assert_eq!(place_label(&FailingGeocoder, fort()).await, "Current Location");
    }

    #[tokio::test]
    async fn suggestions_fall_back_to_empty() {
        assert!(place_suggestions(&FailingGeocoder, "galle", 5).await.is_empty());
    }
}
