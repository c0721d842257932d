//! Hand-authored option tables, in evaluation order.

use super::area::{BoundingBox, OptionTemplate, ServiceArea};
use crate::domain::TransportType::{Bus, Train};

const GALLE: &[OptionTemplate] = &[
    OptionTemplate {
        id: "bus_route_2",
        transport: Bus,
        route_name: "Route 2 to Galle",
        route_number: "2",
        duration_mins: 180,
        walking_m: 200,
        initial_delay_mins: 0,
    },
    OptionTemplate {
        id: "bus_route_32",
        transport: Bus,
        route_name: "Route 32 to Galle",
        route_number: "32",
        duration_mins: 185,
        walking_m: 250,
        initial_delay_mins: 0,
    },
    OptionTemplate {
        id: "train_coastal",
        transport: Train,
        route_name: "Coastal Line to Galle",
        route_number: "CL-01",
        duration_mins: 150,
        walking_m: 300,
        initial_delay_mins: 0,
    },
];

const KANDY: &[OptionTemplate] = &[
    OptionTemplate {
        id: "bus_route_1",
        transport: Bus,
        route_name: "Route 1 to Kandy",
        route_number: "1",
        duration_mins: 210,
        walking_m: 200,
        initial_delay_mins: 0,
    },
    OptionTemplate {
        id: "train_main_line",
        transport: Train,
        route_name: "Main Line to Kandy",
        route_number: "ML-05",
        duration_mins: 180,
        walking_m: 350,
        initial_delay_mins: 10,
    },
];

const HOMAGAMA: &[OptionTemplate] = &[
    OptionTemplate {
        id: "bus_route_177",
        transport: Bus,
        route_name: "Route 177 to Homagama",
        route_number: "177",
        duration_mins: 45,
        walking_m: 180,
        initial_delay_mins: 0,
    },
    OptionTemplate {
        id: "train_kelani",
        transport: Train,
        route_name: "Kelani Valley Line to Homagama",
        route_number: "KV-03",
        duration_mins: 35,
        walking_m: 300,
        initial_delay_mins: 0,
    },
];

const ELPITIYA: &[OptionTemplate] = &[OptionTemplate {
    id: "bus_route_401",
    transport: Bus,
    route_name: "Route 401 to Elpitiya",
    route_number: "401",
    duration_mins: 240,
    walking_m: 150,
    initial_delay_mins: 0,
}];

/// Areas checked in order; the first containing box wins.
pub const SERVICE_AREAS: &[ServiceArea] = &[
    ServiceArea {
        name: "Galle",
        bounds: BoundingBox::new(6.0, 6.1, 80.2, 80.3),
        options: GALLE,
    },
    ServiceArea {
        name: "Kandy",
        bounds: BoundingBox::new(7.25, 7.35, 80.6, 80.7),
        options: KANDY,
    },
    ServiceArea {
        name: "Homagama",
        bounds: BoundingBox::new(6.8, 6.9, 80.0, 80.1),
        options: HOMAGAMA,
    },
    ServiceArea {
        name: "Elpitiya",
        bounds: BoundingBox::new(6.29, 6.30, 80.16, 80.17),
        options: ELPITIYA,
    },
];

/// Used when no area matches the destination.
pub const FALLBACK: OptionTemplate = OptionTemplate {
    id: "bus_general",
    transport: Bus,
    route_name: "General Bus Route",
    route_number: "100",
    duration_mins: 90,
    walking_m: 200,
    initial_delay_mins: 0,
};
