//! Reference polylines for drawing an option on a map.
//!
//! The polylines are approximations of the real roads and railway, stored
//! as (latitude, longitude) pairs. Only the points inside the rectangle
//! spanned by origin and destination (plus [`PATH_PADDING_DEG`]) are kept.

use serde::Serialize;

use crate::domain::{Coordinate, RouteId, RouteOption, TransportType};

/// Padding around the origin/destination rectangle, in degrees.
pub const PATH_PADDING_DEG: f64 = 0.05;

const BUS_PALETTE: [&str; 4] = ["#2563eb", "#3b82f6", "#1d4ed8", "#1e40af"];
const TRAIN_PALETTE: [&str; 4] = ["#dc2626", "#ef4444", "#b91c1c", "#991b1b"];

/// Route 2, Colombo Fort to Galle along the coast.
const ROUTE_2_COASTAL_ROAD: &[(f64, f64)] = &[
    (6.9357, 79.8552),
    (6.9319, 79.8478),
    (6.9206, 79.8468),
    (6.9100, 79.8490),
    (6.8950, 79.8580),
    (6.8802, 79.8621),
    (6.8600, 79.8820),
    (6.8400, 79.9000),
    (6.8200, 79.9200),
    (6.8100, 79.9300),
    (6.7750, 79.9650),
    (6.7200, 80.0050),
    (6.6900, 80.0200),
    (6.6300, 80.0500),
    (6.5800, 80.0750),
    (6.5300, 80.1000),
    (6.4900, 80.1200),
    (6.4500, 80.1400),
    (6.4100, 80.1600),
    (6.3500, 80.1850),
    (6.2900, 80.2000),
    (6.2500, 80.2100),
    (6.2100, 80.2150),
    (6.1700, 80.2180),
    (6.0543, 80.1816),
    (6.0328, 80.2157),
];

/// Route 32, the inland alternative to Galle.
const ROUTE_32_INLAND_ROAD: &[(f64, f64)] = &[
    (6.9319, 79.8478),
    (6.9200, 79.8550),
    (6.9100, 79.8700),
    (6.8900, 79.8900),
    (6.8600, 79.9200),
    (6.8200, 79.9500),
    (6.7800, 79.9700),
    (6.7000, 79.9900),
    (6.6000, 80.0300),
    (6.4000, 80.1500),
    (6.0328, 80.2157),
];

/// Route 401, Elpitiya to Pettah.
const ROUTE_401_ELPITIYA_PETTAH: &[(f64, f64)] = &[
    (6.2917, 80.1631),
    (6.2950, 80.1600),
    (6.3080, 80.1480),
    (6.3220, 80.1350),
    (6.3360, 80.1210),
    (6.3500, 80.1070),
    (6.3640, 80.0930),
    (6.3800, 80.0790),
    (6.4200, 80.0650),
    (6.4500, 80.0520),
    (6.5100, 80.0380),
    (6.5700, 80.0240),
    (6.6200, 80.0120),
    (6.6800, 79.9970),
    (6.7200, 79.9850),
    (6.7600, 79.9710),
    (6.8000, 79.9570),
    (6.8400, 79.9430),
    (6.8800, 79.9220),
    (6.9100, 79.9000),
    (6.9300, 79.8850),
    (6.9340, 79.8502),
];

/// Coastal railway, Colombo Fort to Galle.
const COASTAL_RAILWAY: &[(f64, f64)] = &[
    (6.9319, 79.8478),
    (6.9270, 79.8600),
    (6.8887, 79.8590),
    (6.8700, 79.8750),
    (6.8500, 79.8950),
    (6.8300, 79.9100),
    (6.8150, 79.9250),
    (6.8000, 79.9400),
    (6.7800, 79.9600),
    (6.7000, 80.0150),
    (6.5900, 80.0700),
    (6.4900, 80.1200),
    (6.3700, 80.1800),
    (6.0535, 80.2210),
];

/// A drawable polyline for one option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePath {
    pub route_id: RouteId,
    pub color: &'static str,
    pub points: Vec<Coordinate>,
}

fn is_route(number: &str, names: &[&str]) -> bool {
    names.contains(&number)
}

fn reference_polyline(option: &RouteOption) -> &'static [(f64, f64)] {
    match option.transport {
        TransportType::Train => COASTAL_RAILWAY,
        TransportType::Bus if is_route(&option.route_number, &["32"]) => ROUTE_32_INLAND_ROAD,
        TransportType::Bus if is_route(&option.route_number, &["401"]) => {
            ROUTE_401_ELPITIYA_PETTAH
        }
        TransportType::Bus => ROUTE_2_COASTAL_ROAD,
    }
}

/// Colour used to draw an option, by route number and then by list position.
pub fn route_color(option: &RouteOption, index: usize) -> &'static str {
    let number = option.route_number.as_str();
    if is_route(number, &["2", "02"]) {
        return "#1976d2";
    }
    if is_route(number, &["401"]) {
        return "#4caf50";
    }
    if is_route(number, &["32"]) {
        return "#ff9800";
    }

    match option.transport {
        TransportType::Bus => BUS_PALETTE[index % BUS_PALETTE.len()],
        TransportType::Train => TRAIN_PALETTE[index % TRAIN_PALETTE.len()],
    }
}

/// Build the map polyline for `option` from `origin` to `destination`.
///
/// The result always starts at `origin` and ends at `destination`; reference
/// points outside the padded rectangle are dropped.
pub fn route_path(
    origin: Coordinate,
    destination: Coordinate,
    option: &RouteOption,
    index: usize,
) -> RoutePath {
    let min_lat = origin.latitude().min(destination.latitude()) - PATH_PADDING_DEG;
    let max_lat = origin.latitude().max(destination.latitude()) + PATH_PADDING_DEG;
    let min_lng = origin.longitude().min(destination.longitude()) - PATH_PADDING_DEG;
    let max_lng = origin.longitude().max(destination.longitude()) + PATH_PADDING_DEG;

    let between = reference_polyline(option)
        .iter()
        .filter(|(lat, lng)| {
            (min_lat..=max_lat).contains(lat) && (min_lng..=max_lng).contains(lng)
        })
        .map(|&(lat, lng)| Coordinate::fixed(lat, lng));

    let mut points = vec![origin];
    points.extend(between);
    points.push(destination);

    RoutePath {
        route_id: option.id.clone(),
        color: route_color(option, index),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_options;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn option(id: &str) -> RouteOption {
        let fort = coord(6.9344, 79.8441);
        resolve_options(fort, coord(6.0329, 80.217))
            .into_iter()
            .chain(resolve_options(fort, coord(6.295, 80.165)))
            .chain(resolve_options(fort, coord(7.2906, 80.6337)))
            .find(|o| o.id.as_str() == id)
            .unwrap()
    }

    #[test]
    fn known_route_colours() {
        assert_eq!(route_color(&option("bus_route_2"), 3), "#1976d2");
        assert_eq!(route_color(&option("bus_route_32"), 0), "#ff9800");
        assert_eq!(route_color(&option("bus_route_401"), 0), "#4caf50");
    }

    #[test]
    fn palette_by_position() {
        let train = option("train_coastal");
        assert_eq!(route_color(&train, 0), "#dc2626");
        assert_eq!(route_color(&train, 5), "#ef4444");

        let bus = option("bus_route_1");
        assert_eq!(route_color(&bus, 2), "#1d4ed8");
    }

    #[test]
    fn path_starts_and_ends_at_endpoints() {
        let origin = coord(6.9344, 79.8441);
        let destination = coord(6.0329, 80.217);
        let path = route_path(origin, destination, &option("train_coastal"), 2);

        assert_eq!(path.points.first(), Some(&origin));
        assert_eq!(path.points.last(), Some(&destination));
        // Fort to Galle spans the whole railway.
        assert_eq!(path.points.len(), COASTAL_RAILWAY.len() + 2);
        assert_eq!(path.route_id.as_str(), "train_coastal");
    }

    #[test]
    fn far_away_points_are_dropped() {
        // A short hop inside Colombo keeps only the northern end of route 2.
        let origin = coord(6.9344, 79.8441);
        let destination = coord(6.9100, 79.8490);
        let path = route_path(origin, destination, &option("bus_route_2"), 0);

        assert!(path.points.len() < ROUTE_2_COASTAL_ROAD.len());
        assert!(path.points.iter().all(|p| p.latitude() > 6.8));
    }
}
