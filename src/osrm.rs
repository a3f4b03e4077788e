//! OSRM HTTP adapter for point-to-point routes.

use std::time::Duration;

use serde::Deserialize;

use crate::error::RoutingError;
use crate::model::Coordinate;
use crate::polyline::Polyline;
use crate::traits::{BackendRoute, RoutingBackend};

/// Fixed pair of points used by the availability probe, as (lon, lat).
const PROBE_FROM: (f64, f64) = (19.945, 50.065);
const PROBE_TO: (f64, f64) = (20.0, 50.0);

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    /// Timeout for the availability probe, shorter than a full route request.
    pub probe_timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
            probe_timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
    probe_client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let probe_client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.probe_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            probe_client,
        })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn route_url(&self, from: (f64, f64), to: (f64, f64), overview: &str) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            from.0,
            from.1,
            to.0,
            to.1,
            overview
        )
    }

    fn get(
        client: &reqwest::blocking::Client,
        url: &str,
    ) -> Result<OsrmRouteResponse, RoutingError> {
        tracing::debug!(url, "osrm request");
        let response = client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body: OsrmRouteResponse = response.json()?;
        if body.code != "Ok" {
            tracing::debug!(code = %body.code, message = ?body.message, "osrm rejected request");
            return Err(RoutingError::Code(body.code));
        }
        Ok(body)
    }
}

impl RoutingBackend for OsrmClient {
    fn fetch_route(&self, from: Coordinate, to: Coordinate) -> Result<BackendRoute, RoutingError> {
        let mut url = self.route_url((from.lon(), from.lat()), (to.lon(), to.lat()), "full");
        url.push_str("&geometries=geojson");

        let body = Self::get(&self.client, &url)?;
        let route = body.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;

        let points = route
            .geometry
            .map(|geometry| geometry.coordinates)
            .unwrap_or_default()
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| RoutingError::Malformed(err.to_string()))?;

        Ok(BackendRoute {
            distance_m: route.distance,
            duration_s: route.duration,
            geometry: Polyline::new(points),
        })
    }

    fn probe(&self) -> Result<(), RoutingError> {
        let url = self.route_url(PROBE_FROM, PROBE_TO, "false");
        Self::get(&self.probe_client, &url).map(|_| ())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}
