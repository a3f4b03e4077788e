//! Real Małopolska locations for scenario tests.
//!
//! Coordinates taken from OpenStreetMap, rounded to four decimals.

use dispatch_planner::model::{Coordinate, Destination, Origin};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub group: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, group: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, group, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon).expect("fixture coordinate")
    }
}

pub const WORKSHOPS: &[Location] = &[
    Location::new("Warsztat Kraków", "Kraków", 50.0614, 19.9366),
    Location::new("Warsztat Tarnów", "Tarnów", 50.0121, 20.9858),
    Location::new("Warsztat Nowy Sącz", "Nowy Sącz", 49.6218, 20.6972),
];

pub const TECHNICIANS: &[Location] = &[
    Location::new("Jan Nowak", "Kraków", 50.0833, 19.9167),
    Location::new("Anna Kowalska", "Kraków", 50.0167, 20.0167),
    Location::new("Piotr Wiśniewski", "Tarnów", 50.0121, 20.9858),
    Location::new("Ewa Lis", "Nowy Sącz", 49.6218, 20.6972),
    Location::new("Marek Zieliński", "Kraków", 50.0750, 19.7833),
];

pub const SITES: &[Location] = &[
    Location::new("Budowa Wieliczka", "K-101", 49.9870, 20.0647),
    Location::new("Budowa Bochnia", "K-102", 49.9690, 20.4300),
    Location::new("Budowa Limanowa", "K-103", 49.7060, 20.4220),
];

pub fn technicians() -> Vec<Origin> {
    TECHNICIANS
        .iter()
        .map(|loc| Origin::technician(loc.name, loc.group, loc.coordinate(), ""))
        .collect()
}

pub fn workshops() -> Vec<Destination> {
    WORKSHOPS
        .iter()
        .map(|loc| Destination::workshop(loc.name, loc.coordinate()))
        .collect()
}

/// Sites reuse `group` as the cost-centre identifier.
pub fn sites() -> Vec<Destination> {
    SITES
        .iter()
        .map(|loc| Destination::site(loc.name, loc.group, loc.coordinate()))
        .collect()
}
