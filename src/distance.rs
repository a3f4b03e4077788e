//! Route provider: live routing with bounded retries, haversine fallback.
//!
//! [`DistanceProvider::route`] never fails. Timeouts are retried, any other
//! backend error goes straight to the fallback estimate.

use std::thread;
use std::time::Duration;

use crate::haversine::fallback_route;
use crate::model::{round1, Coordinate, Route, RouteSource};
use crate::polyline::Polyline;
use crate::traits::{BackendRoute, RoutingBackend};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total backend calls per route, including the first.
    pub max_attempts: u32,
    /// Pause before a retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub max_attempts: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { max_attempts: 2 }
    }
}

/// Routes between two points using a [`RoutingBackend`], falling back to
/// the haversine estimate.
#[derive(Debug, Clone)]
pub struct DistanceProvider<B> {
    backend: B,
    retry: RetryPolicy,
    probe: ProbeConfig,
}

impl<B: RoutingBackend> DistanceProvider<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
            probe: ProbeConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Route from `origin` to `destination`.
    ///
    /// With `force_fallback` the backend is not contacted at all.
    pub fn route(&self, origin: Coordinate, destination: Coordinate, force_fallback: bool) -> Route {
        if !force_fallback {
            if let Some(route) = self.try_backend(origin, destination) {
                return route;
            }
        }
        fallback_route(origin, destination)
    }

    fn try_backend(&self, origin: Coordinate, destination: Coordinate) -> Option<Route> {
        let attempts = self.retry.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.backend.fetch_route(origin, destination) {
                Ok(raw) => return Some(to_route(raw, origin, destination)),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    tracing::warn!(attempt, %origin, %destination, "routing timed out, retrying");
                    thread::sleep(self.retry.backoff);
                }
                Err(err) => {
                    tracing::warn!(error = %err, %origin, %destination, "routing failed, using fallback");
                    return None;
                }
            }
        }
        None
    }

    /// Ask the backend whether it is up. Retries any failure up to the
    /// configured attempt count.
    pub fn probe(&self) -> bool {
        let attempts = self.probe.max_attempts.max(1);
        for attempt in 1..=attempts {
            match self.backend.probe() {
                Ok(()) => return true,
                Err(err) => {
                    tracing::debug!(attempt, error = %err, "availability probe failed");
                }
            }
        }
        tracing::warn!("routing backend unavailable");
        false
    }
}

fn to_route(raw: BackendRoute, origin: Coordinate, destination: Coordinate) -> Route {
    let geometry = if raw.geometry.len() >= 2 {
        raw.geometry
    } else {
        Polyline::straight(origin, destination)
    };
    Route {
        distance_km: round1(raw.distance_m.max(0.0) / 1000.0),
        duration_min: round1(raw.duration_s.max(0.0) / 60.0),
        geometry,
        source: RouteSource::Network,
    }
}

/// Per-session memo of the availability probe.
///
/// Probed at most once until [`BackendAvailability::invalidate`] is called
/// (on a user-triggered data refresh).
#[derive(Debug, Clone, Default)]
pub struct BackendAvailability {
    available: Option<bool>,
}

impl BackendAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result, probing first if nothing is cached.
    pub fn is_available<B: RoutingBackend>(&mut self, provider: &DistanceProvider<B>) -> bool {
        *self.available.get_or_insert_with(|| provider.probe())
    }

    pub fn cached(&self) -> Option<bool> {
        self.available
    }

    pub fn invalidate(&mut self) {
        self.available = None;
    }
}
