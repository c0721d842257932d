//! Transit stops.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::TransportType;

/// A bus stop or railway station near a point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub stop_type: TransportType,
    /// Distance from the query point in metres.
    pub distance: f64,
    /// Labels of the routes serving this stop.
    pub routes: BTreeSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_is_camel_case() {
        let stop = Stop {
            id: "cmb_fort_rs".into(),
            name: "Colombo Fort Railway Station".into(),
            stop_type: TransportType::Train,
            distance: 120.5,
            routes: ["CL-01".to_string(), "ML-05".to_string()].into(),
        };

        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["stopType"], "train");
        assert_eq!(json["routes"][0], "CL-01");
        assert_eq!(json["distance"], 120.5);
    }
}
