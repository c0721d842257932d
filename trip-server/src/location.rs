//! Where the trip starts.

use crate::domain::Coordinate;
use crate::places::{Place, manual_origin};

/// Used when the device cannot provide a position.
pub const DEFAULT_LOCATION: Coordinate = Coordinate::fixed(6.9344, 79.8441);

/// Label of [`DEFAULT_LOCATION`].
pub const DEFAULT_LOCATION_LABEL: &str = "Colombo Fort";

/// Shown while a reverse-geocoding lookup is in flight.
pub const PENDING_LABEL: &str = "Getting location name...";

/// A location update from the client.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFix {
    /// A position reported by the device.
    Device(Coordinate),
    /// The device could not (or would not) report a position.
    Unavailable,
    /// One of the manual origins, by name.
    Manual(String),
}

/// How a fix resolves before any geocoding.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLocation {
    /// The label still has to be looked up.
    NeedsLabel(Coordinate),
    /// Coordinate and final label are known.
    Labelled(Coordinate, String),
}

/// Error for a manual origin that is not in the list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown origin: {0}")]
pub struct UnknownOrigin(pub String);

impl LocationFix {
    pub fn resolve(&self) -> Result<ResolvedLocation, UnknownOrigin> {
        match self {
            LocationFix::Device(at) => Ok(ResolvedLocation::NeedsLabel(*at)),
            LocationFix::Unavailable => Ok(ResolvedLocation::Labelled(
                DEFAULT_LOCATION,
                DEFAULT_LOCATION_LABEL.to_string(),
            )),
            LocationFix::Manual(name) => manual_origin(name)
                .map(|Place { name, coordinate, .. }| ResolvedLocation::Labelled(coordinate, name))
                .ok_or_else(|| UnknownOrigin(name.clone())),
        }
    }
}
