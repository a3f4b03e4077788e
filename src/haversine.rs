//! Haversine distance and the analytic fallback route.
//!
//! Used when OSRM is unavailable. Less accurate than road routing but
//! always available.

use crate::model::{round1, Coordinate, Route, RouteSource};
use crate::polyline::Polyline;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Multiplier turning a straight line into a rough road distance.
pub const ROAD_DETOUR_FACTOR: f64 = 1.3;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let (lat1, lng1) = from.as_tuple();
    let (lat2, lng2) = to.as_tuple();

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Clamp guards asin against a rounding overshoot for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Straight-line estimate of a road route.
///
/// Distance is the haversine distance times [`ROAD_DETOUR_FACTOR`], rounded
/// to one decimal. Duration in minutes equals the distance in kilometers,
/// i.e. an assumed 60 km/h. The path is the two endpoints.
pub fn fallback_route(from: Coordinate, to: Coordinate) -> Route {
    let distance_km = round1(haversine_km(from, to) * ROAD_DETOUR_FACTOR);
    Route {
        distance_km,
        duration_min: distance_km,
        geometry: Polyline::straight(from, to),
        source: RouteSource::Fallback,
    }
}
