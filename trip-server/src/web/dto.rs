//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, InvalidCoordinate, OptionsSummary};
use crate::location::LocationFix;
use crate::notify::Notification;
use crate::places::{Place, PlaceKind, popular_destination};
use crate::session::{SearchStart, TripSearchState};

/// Envelope used by the option and stop endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success",
            data,
        }
    }
}

/// Query for `GET /routes/options`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRequest {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

impl OptionsRequest {
    pub fn endpoints(&self) -> Result<(Coordinate, Coordinate), InvalidCoordinate> {
        Ok((
            Coordinate::new(self.from_lat, self.from_lng)?,
            Coordinate::new(self.to_lat, self.to_lng)?,
        ))
    }
}

/// Query for `GET /location/nearbyStops`.
///
/// Without `lat`/`lng` the session's current location is used.
#[derive(Debug, Deserialize)]
pub struct NearbyStopsRequest {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Search radius in metres
    pub radius: Option<u32>,
}

impl NearbyStopsRequest {
    pub fn at(&self) -> Result<Option<Coordinate>, InvalidCoordinate> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }
}

/// Query for `GET /destinations/search`.
#[derive(Debug, Deserialize)]
pub struct DestinationSearchRequest {
    pub q: String,
}

/// Body of `POST /session/location`.
#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum LocationRequest {
    Device { lat: f64, lng: f64 },
    Unavailable,
    Manual { name: String },
}

impl TryFrom<LocationRequest> for LocationFix {
    type Error = InvalidCoordinate;

    fn try_from(req: LocationRequest) -> Result<Self, Self::Error> {
        Ok(match req {
            LocationRequest::Device { lat, lng } => LocationFix::Device(Coordinate::new(lat, lng)?),
            LocationRequest::Unavailable => LocationFix::Unavailable,
            LocationRequest::Manual { name } => LocationFix::Manual(name),
        })
    }
}

/// Body of `POST /session/query`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Body of `POST /session/destination`.
///
/// A bare name must be one of the popular destinations; a suggestion from
/// the geocoder carries its coordinates.
#[derive(Debug, Deserialize)]
pub struct DestinationRequest {
    pub name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<PlaceKind>,
}

/// Why a [`DestinationRequest`] could not be turned into a place.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DestinationRequestError {
    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),

    #[error("unknown destination: {0}")]
    UnknownPlace(String),
}

impl DestinationRequest {
    pub fn into_place(self) -> Result<Place, DestinationRequestError> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Ok(Place::new(
                self.name,
                Coordinate::new(lat, lng)?,
                self.kind.unwrap_or(PlaceKind::Other),
            )),
            _ => popular_destination(&self.name)
                .ok_or(DestinationRequestError::UnknownPlace(self.name)),
        }
    }
}

/// Response for `GET /session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub state: TripSearchState,
    pub summary: Option<OptionsSummary>,
}

impl From<TripSearchState> for SessionResponse {
    fn from(state: TripSearchState) -> Self {
        let summary = OptionsSummary::from_options(&state.active_options);
        Self { state, summary }
    }
}

/// Response for `POST /session/destination`.
#[derive(Debug, Serialize)]
pub struct SearchStartResponse {
    pub generation: u64,
    /// False when no origin is known and the search was skipped
    pub started: bool,
}

impl From<SearchStart> for SearchStartResponse {
    fn from(start: SearchStart) -> Self {
        match start {
            SearchStart::Started { generation } => Self {
                generation,
                started: true,
            },
            SearchStart::Skipped { generation } => Self {
                generation,
                started: false,
            },
        }
    }
}

/// Response for the destination list endpoints.
#[derive(Debug, Serialize)]
pub struct DestinationsResponse {
    pub destinations: Vec<Place>,
}

/// Response for `GET /notifications`.
#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_request_variants() {
        let device: LocationRequest =
            serde_json::from_str(r#"{"source": "device", "lat": 6.9271, "lng": 79.8612}"#)
                .unwrap();
        assert_eq!(
            LocationFix::try_from(device).unwrap(),
            LocationFix::Device(Coordinate::new(6.9271, 79.8612).unwrap())
        );

        let manual: LocationRequest =
            serde_json::from_str(r#"{"source": "manual", "name": "Pettah"}"#).unwrap();
        assert_eq!(
            LocationFix::try_from(manual).unwrap(),
            LocationFix::Manual("Pettah".into())
        );

        let unavailable: LocationRequest =
            serde_json::from_str(r#"{"source": "unavailable"}"#).unwrap();
        assert_eq!(
            LocationFix::try_from(unavailable).unwrap(),
            LocationFix::Unavailable
        );
    }

    #[test]
    fn device_location_must_be_valid() {
        let req = LocationRequest::Device {
            lat: 123.0,
            lng: 79.0,
        };
        assert!(LocationFix::try_from(req).is_err());
    }

    #[test]
    fn destination_by_name() {
        let req: DestinationRequest = serde_json::from_str(r#"{"name": "Galle Fort"}"#).unwrap();
        let place = req.into_place().unwrap();
        assert_eq!(place.kind, PlaceKind::Fort);
        assert_eq!(place.coordinate, Coordinate::new(6.0329, 80.217).unwrap());
    }

    #[test]
    fn destination_with_coordinates() {
        let req: DestinationRequest = serde_json::from_str(
            r#"{"name": "Hikkaduwa", "lat": 6.1395, "lng": 80.1063, "type": "beach"}"#,
        )
        .unwrap();
        let place = req.into_place().unwrap();
        assert_eq!(place.name, "Hikkaduwa");
        assert_eq!(place.kind, PlaceKind::Beach);
    }

    #[test]
    fn unknown_destination_name() {
        let req: DestinationRequest = serde_json::from_str(r#"{"name": "Atlantis"}"#).unwrap();
        assert_eq!(
            req.into_place(),
            Err(DestinationRequestError::UnknownPlace("Atlantis".into()))
        );
    }

    #[test]
    fn options_request_endpoints() {
        let req: OptionsRequest = serde_json::from_str(
            r#"{"fromLat": 6.9344, "fromLng": 79.8441, "toLat": 6.0329, "toLng": 80.217}"#,
        )
        .unwrap();
        let (from, to) = req.endpoints().unwrap();
        assert_eq!(from.latitude(), 6.9344);
        assert_eq!(to.longitude(), 80.217);
    }

    #[test]
    fn session_response_includes_summary() {
        let state = TripSearchState {
            active_options: crate::resolver::resolve_options(
                Coordinate::new(6.9344, 79.8441).unwrap(),
                Coordinate::new(6.0329, 80.217).unwrap(),
            ),
            ..TripSearchState::default()
        };

        let json = serde_json::to_value(SessionResponse::from(state)).unwrap();
        assert_eq!(json["summary"]["fastestMinutes"], 150);
        assert_eq!(json["summary"]["total"], 3);
        assert_eq!(json["activeOptions"][0]["id"], "bus_route_2");
        assert_eq!(json["loading"], false);
    }

    #[test]
    fn empty_session_has_no_summary() {
        let json = serde_json::to_value(SessionResponse::from(TripSearchState::default())).unwrap();
        assert!(json["summary"].is_null());
    }
}
