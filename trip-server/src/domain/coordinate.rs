//! Geographic coordinate type.

use std::fmt;

use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct InvalidCoordinate {
    latitude: f64,
    longitude: f64,
    reason: &'static str,
}

/// A WGS84 point with latitude in [-90, 90] and longitude in [-180, 180].
///
/// Any `Coordinate` value is valid by construction.
///
/// # Examples
///
/// ```
/// use trip_server::domain::Coordinate;
///
/// let fort = Coordinate::new(6.9344, 79.8441).unwrap();
/// assert_eq!(fort.latitude(), 6.9344);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        let reject = |reason| InvalidCoordinate {
            latitude,
            longitude,
            reason,
        };

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(reject("components must be finite"));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(reject("latitude must be within [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(reject("longitude must be within [-180, 180]"));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build a coordinate from compile-time constants.
    ///
    /// Only for literal tables inside the crate; the values must already be in range.
    pub(crate) const fn fixed(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Midpoint of two coordinates (used to centre a map between origin and destination).
    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate {
            latitude: (self.latitude + other.latitude) / 2.0,
            longitude: (self.longitude + other.longitude) / 2.0,
        }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub fn to_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// Great-circle distance in metres.
    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        Haversine.distance(self.to_point(), other.to_point())
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Unvalidated wire form of a coordinate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.01, 0.0).is_err());
        assert!(Coordinate::new(-90.01, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn error_message_names_reason() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("latitude must be within"));
    }

    #[test]
    fn display_uses_four_decimals() {
        let c = Coordinate::new(6.93441, 79.84412).unwrap();
        assert_eq!(c.to_string(), "6.9344, 79.8441");
    }

    #[test]
    fn midpoint() {
        let a = Coordinate::new(6.0, 80.0).unwrap();
        let b = Coordinate::new(7.0, 81.0).unwrap();
        let m = a.midpoint(&b);
        assert_eq!(m.latitude(), 6.5);
        assert_eq!(m.longitude(), 80.5);
    }

    #[test]
    fn distance_between_fort_and_pettah() {
        let fort = Coordinate::new(6.9344, 79.8441).unwrap();
        let pettah = Coordinate::new(6.9354, 79.8500).unwrap();
        let d = fort.distance_m(&pettah);
        assert!((600.0..700.0).contains(&d), "got {d}");
        assert_eq!(fort.distance_m(&fort), 0.0);
    }

    #[test]
    fn deserialize_validates() {
        let ok: Result<Coordinate, _> =
            serde_json::from_str(r#"{"latitude": 6.9, "longitude": 79.8}"#);
        assert!(ok.is_ok());

        let bad: Result<Coordinate, _> =
            serde_json::from_str(r#"{"latitude": 120.0, "longitude": 79.8}"#);
        assert!(bad.is_err());
    }
}
