//! Core data model: coordinates, origins, destinations and routes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;
use crate::polyline::Polyline;

/// A WGS84 position in decimal degrees.
///
/// Always valid once constructed: latitude within [-90, 90], longitude
/// within [-180, 180], both finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoordinateError::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// (lat, lon) tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = CoordinateError;

    fn try_from((lat, lon): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(lat, lon)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(coord: Coordinate) -> Self {
        coord.as_tuple()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Parses the spreadsheet form `"<lat>, <lon>"`.
impl FromStr for Coordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(CoordinateError::Format(s.to_string()));
        };
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Format(s.to_string()))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|_| CoordinateError::Format(s.to_string()))?;
        Self::new(lat, lon)
    }
}

/// Whether an origin is a person or a fixed workshop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginKind {
    Technician,
    Workshop,
}

impl fmt::Display for OriginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginKind::Technician => f.write_str("technician"),
            OriginKind::Workshop => f.write_str("workshop"),
        }
    }
}

/// A technician or workshop whose travel to a destination is evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub name: String,
    /// Affiliation, usually the home workshop.
    pub group: String,
    pub location: Coordinate,
    /// Address label as typed in the roster, for display only.
    pub address: String,
    pub kind: OriginKind,
}

impl Origin {
    pub fn technician(
        name: impl Into<String>,
        group: impl Into<String>,
        location: Coordinate,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            location,
            address: address.into(),
            kind: OriginKind::Technician,
        }
    }

    /// A fixed workshop treated as a synthetic origin. Its group is its own name.
    pub fn workshop(name: impl Into<String>, location: Coordinate) -> Self {
        let name = name.into();
        Self {
            group: name.clone(),
            address: String::new(),
            name,
            location,
            kind: OriginKind::Workshop,
        }
    }
}

/// What kind of place a destination is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DestinationKind {
    Site,
    Workshop,
}

/// A target site for which the nearest or cheapest origin is sought.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    /// Free-form identifier, e.g. a cost-centre code.
    pub identifier: String,
    pub location: Coordinate,
    pub kind: DestinationKind,
    /// Opaque enrichment data such as equipment counts.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Destination {
    pub fn site(name: impl Into<String>, identifier: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            location,
            kind: DestinationKind::Site,
            tags: BTreeMap::new(),
        }
    }

    pub fn workshop(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            identifier: String::new(),
            location,
            kind: DestinationKind::Workshop,
            tags: BTreeMap::new(),
        }
    }
}

/// Where a route's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteSource {
    Network,
    Fallback,
}

/// Distance, duration and geometry for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Kilometers, one decimal.
    pub distance_km: f64,
    /// Minutes, one decimal.
    pub duration_min: f64,
    pub geometry: Polyline,
    pub source: RouteSource,
}

impl Route {
    /// True when the numbers are finite and non-negative and the path has
    /// at least two points.
    pub fn is_usable(&self) -> bool {
        self.distance_km.is_finite()
            && self.distance_km >= 0.0
            && self.duration_min.is_finite()
            && self.duration_min >= 0.0
            && self.geometry.len() >= 2
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
