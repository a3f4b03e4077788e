//! Seams between the engine and the outside world.
//!
//! The engine only talks to networks through these traits, so tests and
//! alternative backends can stand in for OSRM and Nominatim.

use crate::error::{GeocodeError, RoutingError};
use crate::model::Coordinate;
use crate::polyline::Polyline;

/// A road route exactly as the backend reported it, before rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    /// Path geometry, already in (lat, lon) order.
    pub geometry: Polyline,
}

/// A network routing service.
///
/// One call is one request: retries and fallback are the caller's business.
pub trait RoutingBackend: Send + Sync {
    /// Fetch the best road route between two points.
    fn fetch_route(&self, from: Coordinate, to: Coordinate) -> Result<BackendRoute, RoutingError>;

    /// Cheap liveness check. `Ok(())` only if the backend answered with a
    /// success code.
    fn probe(&self) -> Result<(), RoutingError>;
}

/// Resolves free-text addresses to coordinates.
pub trait Geocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// Politeness policy in front of a rate-limited service.
///
/// `acquire` blocks until the next request may be sent.
pub trait RequestGate {
    fn acquire(&self);
}

impl<T: RoutingBackend + ?Sized> RoutingBackend for &T {
    fn fetch_route(&self, from: Coordinate, to: Coordinate) -> Result<BackendRoute, RoutingError> {
        (**self).fetch_route(from, to)
    }

    fn probe(&self) -> Result<(), RoutingError> {
        (**self).probe()
    }
}

impl<T: Geocoder + ?Sized> Geocoder for &T {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        (**self).geocode(address)
    }
}

impl<T: RequestGate + ?Sized> RequestGate for &T {
    fn acquire(&self) {
        (**self).acquire()
    }
}
