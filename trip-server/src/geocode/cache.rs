//! Caching layer for geocoder responses.
//!
//! Reverse lookups are keyed by the coordinate rounded to four decimal
//! places (roughly 11 m), which bounds cache cardinality for a moving
//! device. Only successful responses are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use super::{GeocodeError, Geocoder};
use crate::domain::Coordinate;
use crate::places::Place;

/// Rounded (latitude, longitude) in units of 1e-4 degrees.
type ReverseKey = (i32, i32);

/// Normalised query text and result limit.
type SearchKey = (String, usize);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per lookup kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 1000,
        }
    }
}

fn reverse_key(at: &Coordinate) -> ReverseKey {
    (
        (at.latitude() * 1e4).round() as i32,
        (at.longitude() * 1e4).round() as i32,
    )
}

/// Geocoder with caching.
///
/// Wraps any `Geocoder` and caches reverse and forward lookups.
pub struct CachedGeocoder<G> {
    inner: G,
    labels: MokaCache<ReverseKey, String>,
    searches: MokaCache<SearchKey, Arc<Vec<Place>>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        Self {
            inner,
            labels: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
            searches: MokaCache::builder()
                .time_to_live(config.ttl)
                .max_capacity(config.max_capacity)
                .build(),
        }
    }

    /// Number of cached entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.labels.entry_count() + self.searches.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.labels.invalidate_all();
        self.searches.invalidate_all();
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, GeocodeError> {
        let key = reverse_key(&at);

        if let Some(cached) = self.labels.get(&key).await {
            return Ok(cached);
        }

        let label = self.inner.reverse_geocode(at).await?;
        self.labels.insert(key, label.clone()).await;
        Ok(label)
    }

    async fn search_places(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodeError> {
        let key = (query.trim().to_lowercase(), limit);

        if let Some(cached) = self.searches.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let places = self.inner.search_places(query, limit).await?;
        self.searches.insert(key, Arc::new(places.clone())).await;
        Ok(places)
    }
}
