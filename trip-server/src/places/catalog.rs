//! Built-in places: popular destinations and manual origins.

use serde::{Deserialize, Serialize};

use crate::domain::Coordinate;

/// What sort of place a destination is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Landmark,
    Market,
    Junction,
    Town,
    University,
    Conference,
    City,
    Fort,
    Beach,
    Park,
    Shopping,
    #[serde(other)]
    Other,
}

impl PlaceKind {
    pub fn icon(&self) -> &'static str {
        match self {
            PlaceKind::Landmark => "🏛️",
            PlaceKind::Market => "🏪",
            PlaceKind::Junction => "🚦",
            PlaceKind::Town => "🏘️",
            PlaceKind::University => "🎓",
            PlaceKind::Conference => "🏢",
            PlaceKind::City => "🏙️",
            PlaceKind::Fort => "🏰",
            PlaceKind::Beach => "🏖️",
            PlaceKind::Park => "🌳",
            PlaceKind::Shopping => "🛒",
            PlaceKind::Other => "📍",
        }
    }
}

/// A named point a trip can start or end at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub coordinate: Coordinate,
    #[serde(rename = "type")]
    pub kind: PlaceKind,
}

impl Place {
    pub fn new(name: impl Into<String>, coordinate: Coordinate, kind: PlaceKind) -> Self {
        Self {
            name: name.into(),
            coordinate,
            kind,
        }
    }
}

struct Entry {
    name: &'static str,
    lat: f64,
    lng: f64,
    kind: PlaceKind,
}

impl Entry {
    fn to_place(&self) -> Place {
        Place::new(self.name, Coordinate::fixed(self.lat, self.lng), self.kind)
    }
}

const fn entry(name: &'static str, lat: f64, lng: f64, kind: PlaceKind) -> Entry {
    Entry {
        name,
        lat,
        lng,
        kind,
    }
}

const POPULAR: &[Entry] = &[
    entry("Colombo Fort", 6.9344, 79.8441, PlaceKind::Landmark),
    entry("Pettah Market", 6.9354, 79.8500, PlaceKind::Market),
    entry("Bambalapitiya Junction", 6.8887, 79.8590, PlaceKind::Junction),
    entry("Nugegoda Town", 6.8659, 79.8977, PlaceKind::Town),
    entry("University of Colombo", 6.9022, 79.8607, PlaceKind::University),
    entry(
        "Bandaranaike Memorial International Conference Hall",
        6.9147,
        79.8731,
        PlaceKind::Conference,
    ),
    entry("Kandy City Center", 7.2906, 80.6337, PlaceKind::City),
    entry("Galle Fort", 6.0329, 80.217, PlaceKind::Fort),
    entry("Mount Lavinia Beach", 6.8383, 79.8656, PlaceKind::Beach),
    entry("Independence Square", 6.9034, 79.8682, PlaceKind::Landmark),
    entry("Viharamahadevi Park", 6.9147, 79.8612, PlaceKind::Park),
    entry("Keells Super - Wellawatte", 6.8697, 79.8618, PlaceKind::Shopping),
];

const MANUAL_ORIGINS: &[Entry] = &[
    entry("Colombo Fort", 6.9344, 79.8441, PlaceKind::Landmark),
    entry("Pettah", 6.9354, 79.8500, PlaceKind::Market),
    entry("Bambalapitiya", 6.8887, 79.8590, PlaceKind::Junction),
    entry("Nugegoda", 6.8659, 79.8977, PlaceKind::Town),
    entry("Maharagama", 6.8477, 79.9267, PlaceKind::Town),
    entry("Kandy", 7.2906, 80.6337, PlaceKind::City),
    entry("Galle", 6.0329, 80.217, PlaceKind::City),
];

/// Destinations offered before the user types anything.
pub fn popular_destinations() -> Vec<Place> {
    POPULAR.iter().map(Entry::to_place).collect()
}

/// Origins selectable when the device location is unavailable or unwanted.
pub fn manual_origins() -> Vec<Place> {
    MANUAL_ORIGINS.iter().map(Entry::to_place).collect()
}

/// Look up a manual origin by exact name.
pub fn manual_origin(name: &str) -> Option<Place> {
    MANUAL_ORIGINS
        .iter()
        .find(|e| e.name == name)
        .map(Entry::to_place)
}

/// Look up a popular destination by exact name.
pub fn popular_destination(name: &str) -> Option<Place> {
    POPULAR.iter().find(|e| e.name == name).map(Entry::to_place)
}
