//! Nominatim-compatible geocoding client.

use std::time::Duration;

use serde::Deserialize;

use crate::error::GeocodeError;
use crate::model::Coordinate;
use crate::traits::Geocoder;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim rejects requests without an identifying User-Agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("dispatch-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    pub fn new(config: NominatimConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        tracing::debug!(address, "geocoding request");

        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Service(format!("HTTP {}", status.as_u16())));
        }

        let places: Vec<Place> = response.json()?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;
        place.coordinate()
    }
}

/// Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinate(&self) -> Result<Coordinate, GeocodeError> {
        let lat = self
            .lat
            .parse::<f64>()
            .map_err(|_| GeocodeError::Service(format!("bad latitude {:?}", self.lat)))?;
        let lon = self
            .lon
            .parse::<f64>()
            .map_err(|_| GeocodeError::Service(format!("bad longitude {:?}", self.lon)))?;
        Ok(Coordinate::new(lat, lon)?)
    }
}
