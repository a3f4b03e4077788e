//! Engine configuration with environment overrides.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cost::CostRates;
use crate::distance::{DistanceProvider, ProbeConfig, RetryPolicy};
use crate::nominatim::{NominatimConfig, NominatimGeocoder};
use crate::osrm::{OsrmClient, OsrmConfig};
use crate::rate_limit::{IntervalGate, GEOCODER_MIN_INTERVAL};
use crate::ranking::RankOptions;

pub const ENV_OSRM_URL: &str = "DISPATCH_OSRM_URL";
pub const ENV_OSRM_PROFILE: &str = "DISPATCH_OSRM_PROFILE";
pub const ENV_GEOCODER_URL: &str = "DISPATCH_GEOCODER_URL";
pub const ENV_USER_AGENT: &str = "DISPATCH_USER_AGENT";
pub const ENV_CACHE_PATH: &str = "DISPATCH_CACHE_PATH";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub osrm: OsrmConfig,
    pub geocoder: NominatimConfig,
    /// Minimum spacing between geocoding requests.
    pub geocode_interval: Duration,
    pub retry: RetryPolicy,
    pub probe: ProbeConfig,
    pub rates: CostRates,
    /// Geocode cache file. `None` keeps the cache in memory.
    pub cache_path: Option<PathBuf>,
    /// Routing threads for ranking; 1 is sequential.
    pub workers: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            osrm: OsrmConfig::default(),
            geocoder: NominatimConfig::default(),
            geocode_interval: GEOCODER_MIN_INTERVAL,
            retry: RetryPolicy::default(),
            probe: ProbeConfig::default(),
            rates: CostRates::default(),
            cache_path: Some(PathBuf::from("geocode_cache.csv")),
            workers: 1,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `DISPATCH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(url) = get(ENV_OSRM_URL) {
            config.osrm.base_url = url;
        }
        if let Some(profile) = get(ENV_OSRM_PROFILE) {
            config.osrm.profile = profile;
        }
        if let Some(url) = get(ENV_GEOCODER_URL) {
            config.geocoder.base_url = url;
        }
        if let Some(agent) = get(ENV_USER_AGENT) {
            config.geocoder.user_agent = agent;
        }
        if let Some(path) = get(ENV_CACHE_PATH) {
            config.cache_path = Some(PathBuf::from(path));
        }
        config
    }

    pub fn distance_provider(&self) -> Result<DistanceProvider<OsrmClient>, reqwest::Error> {
        let client = OsrmClient::new(self.osrm.clone())?;
        Ok(DistanceProvider::new(client)
            .with_retry(self.retry.clone())
            .with_probe(self.probe.clone()))
    }

    pub fn geocoder(&self) -> Result<NominatimGeocoder, reqwest::Error> {
        NominatimGeocoder::new(self.geocoder.clone())
    }

    pub fn request_gate(&self) -> IntervalGate {
        IntervalGate::new(self.geocode_interval)
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            workers: self.workers,
        }
    }
}
