//! Route option resolver.
//!
//! There is no routing here: the destination is matched against a small
//! ordered list of named bounding boxes and the options of the first match
//! are returned. Destinations outside every box get a single generic bus.

mod area;
mod catalog;
mod paths;

pub use area::{BoundingBox, OptionTemplate, ServiceArea};
pub use catalog::{FALLBACK, SERVICE_AREAS};
pub use paths::{PATH_PADDING_DEG, RoutePath, route_color, route_path};

use tracing::debug;

use crate::domain::{Coordinate, RouteOption};

/// Find the service area containing `destination`, if any.
pub fn area_for(destination: &Coordinate) -> Option<&'static ServiceArea> {
    SERVICE_AREAS.iter().find(|area| area.contains(destination))
}

/// Resolve the candidate options for a trip.
///
/// Deterministic: the same destination always yields the same list with the
/// same ids. The origin does not influence the result.
pub fn resolve_options(_origin: Coordinate, destination: Coordinate) -> Vec<RouteOption> {
    match area_for(&destination) {
        Some(area) => {
            debug!(area = area.name, %destination, "Resolved service area");
            area.options.iter().map(OptionTemplate::build).collect()
        }
        None => {
            debug!(%destination, "No service area, using fallback option");
            vec![FALLBACK.build()]
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every point inside the Galle box resolves to the Galle options
        #[test]
        fn galle_box(lat in 6.0f64..=6.1, lng in 80.2f64..=80.3) {
            let options = resolve_options(
                Coordinate::new(6.9344, 79.8441).unwrap(),
                Coordinate::new(lat, lng).unwrap(),
            );
            let ids: Vec<_> = options.iter().map(|o| o.id.as_str()).collect();
            prop_assert_eq!(ids, vec!["bus_route_2", "bus_route_32", "train_coastal"]);
        }

        /// Points north of every box always get the fallback
        #[test]
        fn north_of_all_boxes(lat in 7.36f64..10.0, lng in 79.5f64..82.0) {
            let options = resolve_options(
                Coordinate::new(6.9344, 79.8441).unwrap(),
                Coordinate::new(lat, lng).unwrap(),
            );
            prop_assert_eq!(options.len(), 1);
            prop_assert_eq!(options[0].id.as_str(), "bus_general");
        }

        /// Resolution is deterministic
        #[test]
        fn repeatable(lat in 5.0f64..10.0, lng in 79.0f64..82.0) {
            let origin = Coordinate::new(6.9344, 79.8441).unwrap();
            let destination = Coordinate::new(lat, lng).unwrap();
            prop_assert_eq!(
                resolve_options(origin, destination),
                resolve_options(origin, destination)
            );
        }
    }
}
