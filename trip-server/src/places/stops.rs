//! Built-in stop catalog for nearby-stop lookups.

use crate::domain::{Coordinate, Stop, TransportType};

struct StopEntry {
    id: &'static str,
    name: &'static str,
    stop_type: TransportType,
    lat: f64,
    lng: f64,
    routes: &'static [&'static str],
}

const fn bus(
    id: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    routes: &'static [&'static str],
) -> StopEntry {
    StopEntry {
        id,
        name,
        stop_type: TransportType::Bus,
        lat,
        lng,
        routes,
    }
}

const fn rail(
    id: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    routes: &'static [&'static str],
) -> StopEntry {
    StopEntry {
        id,
        name,
        stop_type: TransportType::Train,
        lat,
        lng,
        routes,
    }
}

const STOPS: &[StopEntry] = &[
    bus("cmb_central_bus", "Central Bus Stand, Fort", 6.9357, 79.8552, &["1", "2", "32", "100"]),
    bus("pettah_bus", "Pettah Bus Station", 6.9340, 79.8502, &["401", "177"]),
    bus("galle_face_bus", "Galle Face", 6.9206, 79.8468, &["2"]),
    bus("bambalapitiya_bus", "Bambalapitiya Junction", 6.8950, 79.8580, &["2", "100"]),
    bus("borella_bus", "Borella Junction", 6.9100, 79.8700, &["32", "177"]),
    bus("nugegoda_bus", "Nugegoda", 6.8659, 79.8977, &["32", "177"]),
    bus("maharagama_bus", "Maharagama", 6.8477, 79.9267, &["177"]),
    bus("galle_bus", "Galle Central Bus Station", 6.0328, 80.2157, &["2", "32"]),
    bus("kandy_bus", "Kandy Goods Shed Bus Stand", 7.2920, 80.6310, &["1"]),
    bus("elpitiya_bus", "Elpitiya Bus Station", 6.2917, 80.1631, &["401"]),
    rail("fort_rs", "Colombo Fort Railway Station", 6.9319, 79.8478, &["CL-01", "ML-05", "KV-03"]),
    rail("maradana_rs", "Maradana Railway Station", 6.9270, 79.8600, &["CL-01", "ML-05", "KV-03"]),
    rail("bambalapitiya_rs", "Bambalapitiya Railway Station", 6.8887, 79.8590, &["CL-01"]),
    rail("wellawatta_rs", "Wellawatta Railway Station", 6.8700, 79.8750, &["CL-01"]),
    rail("homagama_rs", "Homagama Railway Station", 6.8436, 80.0027, &["KV-03"]),
    rail("galle_rs", "Galle Railway Station", 6.0535, 80.2210, &["CL-01"]),
    rail("kandy_rs", "Kandy Railway Station", 7.2906, 80.6337, &["ML-05"]),
];

impl StopEntry {
    fn coordinate(&self) -> Coordinate {
        Coordinate::fixed(self.lat, self.lng)
    }

    fn to_stop(&self, distance: f64) -> Stop {
        Stop {
            id: self.id.to_string(),
            name: self.name.to_string(),
            stop_type: self.stop_type,
            distance,
            routes: self.routes.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Stops within `radius_m` metres of `at`, nearest first.
pub fn nearby_stops(at: Coordinate, radius_m: u32) -> Vec<Stop> {
    let radius = f64::from(radius_m);
    let mut stops: Vec<Stop> = STOPS
        .iter()
        .filter_map(|entry| {
            let distance = at.distance_m(&entry.coordinate());
            (distance <= radius).then(|| entry.to_stop(distance.round()))
        })
        .collect();

    stops.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    stops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fort() -> Coordinate {
        Coordinate::new(6.9344, 79.8441).unwrap()
    }

    #[test]
    fn nearest_first_within_radius() {
        let stops = nearby_stops(fort(), 1000);

        assert!(!stops.is_empty());
        assert_eq!(stops[0].id, "fort_rs");
        assert!(stops.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(stops.iter().all(|s| s.distance <= 1000.0));
    }

    #[test]
    fn radius_limits_results() {
        let wide = nearby_stops(fort(), 5000);
        let narrow = nearby_stops(fort(), 500);
        assert!(narrow.len() < wide.len());
        assert!(nearby_stops(fort(), 0).is_empty());
    }

    #[test]
    fn galle_has_both_modes() {
        let galle = Coordinate::new(6.0329, 80.217).unwrap();
        let stops = nearby_stops(galle, 3000);

        assert!(stops.iter().any(|s| s.stop_type == TransportType::Bus));
        assert!(stops.iter().any(|s| s.stop_type == TransportType::Train));
    }
}
