//! Polyline representation for route geometries.
//!
//! Points are stored decoded, in (latitude, longitude) order. The routing
//! backend's (lon, lat) order is converted at the boundary in `osrm`.

use serde::{Deserialize, Serialize};

use crate::model::Coordinate;

/// An ordered path of coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// A straight segment between two endpoints.
    pub fn straight(from: Coordinate, to: Coordinate) -> Self {
        Self {
            points: vec![from, to],
        }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Points as `[lat, lon]` pairs, the shape map renderers consume.
    pub fn to_lat_lon_pairs(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.lat(), p.lon()]).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}
