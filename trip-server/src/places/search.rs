//! Destination search.

use std::collections::HashSet;

use super::{Place, popular_destinations};
use crate::geocode::{Geocoder, place_suggestions};

/// Shorter queries produce no suggestions.
pub const MIN_QUERY_LEN: usize = 3;

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Whether `query` is long enough to search for.
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_LEN
}

/// Catalog entries whose name contains `query`, ignoring case.
pub fn catalog_matches(query: &str) -> Vec<Place> {
    let needle = query.trim().to_lowercase();
    popular_destinations()
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

/// Catalog matches followed by geocoder results, deduplicated by name and
/// truncated to `limit`.
///
/// A failing geocoder leaves just the catalog matches.
pub async fn search_destinations<G: Geocoder>(
    geocoder: &G,
    query: &str,
    limit: usize,
) -> Vec<Place> {
    if !is_searchable(query) {
        return Vec::new();
    }

    let mut results = catalog_matches(query);
    if results.len() < limit {
        results.extend(place_suggestions(geocoder, query.trim(), limit).await);
    }

    let mut seen = HashSet::new();
    results.retain(|p| seen.insert(p.name.to_lowercase()));
    results.truncate(limit);
    results
}
