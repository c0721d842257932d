//! Named service areas and the option templates they carry.

use crate::domain::{
    Coordinate, DelayMinutes, RouteId, RouteOption, RouteStatus, TransportType,
};

/// An axis-aligned latitude/longitude box with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude())
            && (self.min_lng..=self.max_lng).contains(&point.longitude())
    }
}

/// Static description of one route option.
#[derive(Debug, Clone, Copy)]
pub struct OptionTemplate {
    pub id: &'static str,
    pub transport: TransportType,
    pub route_name: &'static str,
    pub route_number: &'static str,
    pub duration_mins: u32,
    pub walking_m: u32,
    /// Minutes late at resolution time; zero means on time.
    pub initial_delay_mins: u32,
}

impl OptionTemplate {
    /// Materialise the template into a route option.
    pub fn build(&self) -> RouteOption {
        let status = DelayMinutes::new(self.initial_delay_mins)
            .map(RouteStatus::Delayed)
            .unwrap_or(RouteStatus::OnTime);

        RouteOption {
            id: RouteId::from_static(self.id),
            transport: self.transport,
            route_name: self.route_name.to_string(),
            route_number: self.route_number.to_string(),
            estimated_duration_mins: self.duration_mins,
            walking_distance_m: self.walking_m,
            stops: Vec::new(),
            status,
        }
    }
}

/// A destination area with the options that serve it.
#[derive(Debug, Clone, Copy)]
pub struct ServiceArea {
    pub name: &'static str,
    pub bounds: BoundingBox,
    pub options: &'static [OptionTemplate],
}

impl ServiceArea {
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.bounds.contains(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: BoundingBox = BoundingBox::new(6.0, 6.1, 80.2, 80.3);

    #[test]
    fn bounds_are_inclusive() {
        assert!(BOX.contains(&Coordinate::new(6.0, 80.2).unwrap()));
        assert!(BOX.contains(&Coordinate::new(6.1, 80.3).unwrap()));
        assert!(BOX.contains(&Coordinate::new(6.05, 80.25).unwrap()));
    }

    #[test]
    fn outside_is_rejected() {
        assert!(!BOX.contains(&Coordinate::new(5.99, 80.25).unwrap()));
        assert!(!BOX.contains(&Coordinate::new(6.05, 80.31).unwrap()));
    }

    #[test]
    fn template_with_delay_builds_delayed_option() {
        let template = OptionTemplate {
            id: "t",
            transport: TransportType::Train,
            route_name: "T",
            route_number: "T-1",
            duration_mins: 10,
            walking_m: 20,
            initial_delay_mins: 10,
        };
        let option = template.build();
        assert_eq!(option.status.delay_minutes(), Some(10));

        let on_time = OptionTemplate {
            initial_delay_mins: 0,
            ..template
        }
        .build();
        assert_eq!(on_time.status, RouteStatus::OnTime);
    }
}
