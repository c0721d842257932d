//! Domain types for the trip planner.
//!
//! Values are validated at construction time, so code that receives them
//! can trust their invariants.

mod coordinate;
mod route;
mod stop;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use route::{
    DelayMinutes, InvalidRouteOption, OptionsSummary, RouteId, RouteOption, RouteOptionRecord,
    RouteStatus, StatusCode, TransportType, format_duration, format_walking_distance,
};
pub use stop::Stop;
