//! Destination resolution: catalogs, search, recent destinations and
//! nearby stops.

mod catalog;
mod recent;
mod search;
mod stops;

pub use catalog::{
    Place, PlaceKind, manual_origin, manual_origins, popular_destination, popular_destinations,
};
pub use recent::{MAX_RECENT, RecentDestinations, RecentStoreError};
pub use search::{
    DEFAULT_SUGGESTION_LIMIT, MIN_QUERY_LEN, catalog_matches, is_searchable, search_destinations,
};
pub use stops::nearby_stops;
