//! Transport options between an origin and a destination.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::Stop;

/// Error returned when a route option (or its wire form) violates an invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid route option: {reason}")]
pub struct InvalidRouteOption {
    reason: &'static str,
}

impl InvalidRouteOption {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Identifier of a route option, stable across repeated resolutions.
///
/// # Examples
///
/// ```
/// use trip_server::domain::RouteId;
///
/// let id = RouteId::new("bus_route_2").unwrap();
/// assert_eq!(id.as_str(), "bus_route_2");
/// assert!(RouteId::new("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteId(String);

impl RouteId {
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidRouteOption> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(InvalidRouteOption::new("route id cannot be empty"));
        }
        Ok(RouteId(id))
    }

    /// Build an id from a literal table entry, which is known to be non-empty.
    pub(crate) fn from_static(id: &'static str) -> Self {
        RouteId(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteId {
    type Error = InvalidRouteOption;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        RouteId::new(s)
    }
}

impl From<RouteId> for String {
    fn from(id: RouteId) -> Self {
        id.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({})", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mode of transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Bus,
    Train,
}

impl TransportType {
    pub fn label(&self) -> &'static str {
        match self {
            TransportType::Bus => "Bus",
            TransportType::Train => "Train",
        }
    }
}

/// A strictly positive delay in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DelayMinutes(NonZeroU32);

impl DelayMinutes {
    /// Returns `None` for a zero delay.
    pub fn new(minutes: u32) -> Option<Self> {
        NonZeroU32::new(minutes).map(DelayMinutes)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for DelayMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running status of a route option.
///
/// The delay magnitude lives inside `Delayed`, so a delay can only exist
/// on a delayed option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteStatus {
    #[default]
    OnTime,
    Delayed(DelayMinutes),
    Cancelled,
}

/// Wire name of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    OnTime,
    Delayed,
    Cancelled,
}

impl RouteStatus {
    /// Rebuild a status from its wire parts.
    ///
    /// `delay_minutes` must be a positive number exactly when `code` is `Delayed`.
    pub fn from_parts(
        code: StatusCode,
        delay_minutes: Option<u32>,
    ) -> Result<Self, InvalidRouteOption> {
        match (code, delay_minutes) {
            (StatusCode::OnTime, None) => Ok(RouteStatus::OnTime),
            (StatusCode::Cancelled, None) => Ok(RouteStatus::Cancelled),
            (StatusCode::Delayed, Some(mins)) => DelayMinutes::new(mins)
                .map(RouteStatus::Delayed)
                .ok_or_else(|| InvalidRouteOption::new("delayMinutes must be positive")),
            (StatusCode::Delayed, None) => {
                Err(InvalidRouteOption::new("delayed status requires delayMinutes"))
            }
            (_, Some(_)) => Err(InvalidRouteOption::new(
                "delayMinutes is only allowed on delayed options",
            )),
        }
    }

    pub fn code(&self) -> StatusCode {
        match self {
            RouteStatus::OnTime => StatusCode::OnTime,
            RouteStatus::Delayed(_) => StatusCode::Delayed,
            RouteStatus::Cancelled => StatusCode::Cancelled,
        }
    }

    pub fn delay_minutes(&self) -> Option<u32> {
        match self {
            RouteStatus::Delayed(mins) => Some(mins.get()),
            _ => None,
        }
    }

    pub fn is_on_time(&self) -> bool {
        matches!(self, RouteStatus::OnTime)
    }

    pub fn is_delayed(&self) -> bool {
        matches!(self, RouteStatus::Delayed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RouteStatus::Cancelled)
    }

    /// Human-readable status text.
    pub fn text(&self) -> &'static str {
        match self {
            RouteStatus::OnTime => "On Time",
            RouteStatus::Delayed(_) => "Delayed",
            RouteStatus::Cancelled => "Cancelled",
        }
    }
}

/// One candidate way of getting to the destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteOptionRecord", into = "RouteOptionRecord")]
pub struct RouteOption {
    pub id: RouteId,
    pub transport: TransportType,
    pub route_name: String,
    pub route_number: String,
    pub estimated_duration_mins: u32,
    pub walking_distance_m: u32,
    pub stops: Vec<Stop>,
    pub status: RouteStatus,
}

impl RouteOption {
    /// Returns a copy of this option with a different status.
    pub fn with_status(&self, status: RouteStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// JSON shape of a route option, shared with the transport backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptionRecord {
    pub id: String,
    pub transport_type: TransportType,
    pub route_name: String,
    pub route_number: String,
    pub estimated_duration: u32,
    pub walking_distance: u32,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<u32>,
}

impl TryFrom<RouteOptionRecord> for RouteOption {
    type Error = InvalidRouteOption;

    fn try_from(r: RouteOptionRecord) -> Result<Self, Self::Error> {
        Ok(RouteOption {
            id: RouteId::new(r.id)?,
            transport: r.transport_type,
            route_name: r.route_name,
            route_number: r.route_number,
            estimated_duration_mins: r.estimated_duration,
            walking_distance_m: r.walking_distance,
            stops: r.stops,
            status: RouteStatus::from_parts(r.status, r.delay_minutes)?,
        })
    }
}

impl From<RouteOption> for RouteOptionRecord {
    fn from(o: RouteOption) -> Self {
        RouteOptionRecord {
            id: o.id.into(),
            transport_type: o.transport,
            route_name: o.route_name,
            route_number: o.route_number,
            estimated_duration: o.estimated_duration_mins,
            walking_distance: o.walking_distance_m,
            stops: o.stops,
            status: o.status.code(),
            delay_minutes: o.status.delay_minutes(),
        }
    }
}

/// Headline figures for a candidate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsSummary {
    pub fastest_minutes: u32,
    pub least_walking_meters: u32,
    pub on_time_count: usize,
    pub total: usize,
}

impl OptionsSummary {
    /// Returns `None` for an empty candidate set.
    pub fn from_options(options: &[RouteOption]) -> Option<Self> {
        let fastest_minutes = options.iter().map(|o| o.estimated_duration_mins).min()?;
        let least_walking_meters = options.iter().map(|o| o.walking_distance_m).min()?;

        Some(Self {
            fastest_minutes,
            least_walking_meters,
            on_time_count: options.iter().filter(|o| o.status.is_on_time()).count(),
            total: options.len(),
        })
    }
}

/// Format a duration as "45min" or "3h 5min".
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes}min");
    }
    format!("{}h {}min", minutes / 60, minutes % 60)
}

/// Format a walking distance as "200m walk" or "1.2km walk".
pub fn format_walking_distance(meters: u32) -> String {
    if meters < 1000 {
        return format!("{meters}m walk");
    }
    format!("{:.1}km walk", f64::from(meters) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str, duration: u32, walking: u32, status: RouteStatus) -> RouteOption {
        RouteOption {
            id: RouteId::new(id).unwrap(),
            transport: TransportType::Bus,
            route_name: format!("Route {id}"),
            route_number: id.to_string(),
            estimated_duration_mins: duration,
            walking_distance_m: walking,
            stops: Vec::new(),
            status,
        }
    }

    fn delayed(mins: u32) -> RouteStatus {
        RouteStatus::Delayed(DelayMinutes::new(mins).unwrap())
    }

    #[test]
    fn delay_minutes_rejects_zero() {
        assert!(DelayMinutes::new(0).is_none());
        assert_eq!(DelayMinutes::new(7).unwrap().get(), 7);
    }

    #[test]
    fn status_from_parts() {
        assert_eq!(
            RouteStatus::from_parts(StatusCode::OnTime, None),
            Ok(RouteStatus::OnTime)
        );
        assert_eq!(
            RouteStatus::from_parts(StatusCode::Delayed, Some(10)),
            Ok(delayed(10))
        );
        assert!(RouteStatus::from_parts(StatusCode::Delayed, None).is_err());
        assert!(RouteStatus::from_parts(StatusCode::Delayed, Some(0)).is_err());
        assert!(RouteStatus::from_parts(StatusCode::Cancelled, Some(5)).is_err());
        assert!(RouteStatus::from_parts(StatusCode::OnTime, Some(5)).is_err());
    }

    #[test]
    fn serializes_original_field_names() {
        let json = serde_json::to_value(option("bus_route_2", 180, 200, delayed(12))).unwrap();
        assert_eq!(json["id"], "bus_route_2");
        assert_eq!(json["transportType"], "bus");
        assert_eq!(json["estimatedDuration"], 180);
        assert_eq!(json["walkingDistance"], 200);
        assert_eq!(json["status"], "delayed");
        assert_eq!(json["delayMinutes"], 12);
    }

    #[test]
    fn cancelled_has_no_delay_field() {
        let json =
            serde_json::to_value(option("bus_route_2", 180, 200, RouteStatus::Cancelled)).unwrap();
        assert_eq!(json["status"], "cancelled");
        assert!(json.get("delayMinutes").is_none());
    }

    #[test]
    fn deserializes_null_delay_for_on_time() {
        let json = r#"{
            "id": "train_kelani",
            "transportType": "train",
            "routeName": "Kelani Valley Line to Homagama",
            "routeNumber": "KV-03",
            "estimatedDuration": 35,
            "walkingDistance": 300,
            "stops": [],
            "status": "on_time",
            "delayMinutes": null
        }"#;
        let option: RouteOption = serde_json::from_str(json).unwrap();
        assert_eq!(option.status, RouteStatus::OnTime);
        assert_eq!(option.transport, TransportType::Train);
    }

    #[test]
    fn rejects_delayed_without_minutes() {
        let json = r#"{
            "id": "x", "transportType": "bus", "routeName": "X", "routeNumber": "1",
            "estimatedDuration": 10, "walkingDistance": 10, "status": "delayed"
        }"#;
        assert!(serde_json::from_str::<RouteOption>(json).is_err());
    }

    #[test]
    fn with_status_keeps_identity() {
        let original = option("bus_route_1", 210, 200, RouteStatus::OnTime);
        let updated = original.with_status(RouteStatus::Cancelled);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.status, RouteStatus::Cancelled);
    }

    #[test]
    fn summary() {
        let options = vec![
            option("a", 180, 200, RouteStatus::OnTime),
            option("b", 185, 250, delayed(20)),
            option("c", 150, 300, RouteStatus::OnTime),
        ];
        let summary = OptionsSummary::from_options(&options).unwrap();
        assert_eq!(summary.fastest_minutes, 150);
        assert_eq!(summary.least_walking_meters, 200);
        assert_eq!(summary.on_time_count, 2);
        assert_eq!(summary.total, 3);

        assert!(OptionsSummary::from_options(&[]).is_none());
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(45), "45min");
        assert_eq!(format_duration(60), "1h 0min");
        assert_eq!(format_duration(185), "3h 5min");
    }

    #[test]
    fn walking_formatting() {
        assert_eq!(format_walking_distance(200), "200m walk");
        assert_eq!(format_walking_distance(1000), "1.0km walk");
        assert_eq!(format_walking_distance(1250), "1.2km walk");
    }
}
