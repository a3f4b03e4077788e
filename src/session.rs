//! Batch orchestration and per-session state.
//!
//! [`geocode_roster`] turns a roster snapshot into origins, and
//! [`AnalysisSession`] carries the selected destination, the memoized
//! backend probe and the last analysis between calls.

use std::path::Path;

use serde::Serialize;

use crate::cost::CostRates;
use crate::distance::{BackendAvailability, DistanceProvider};
use crate::error::{AnalysisError, BatchWarning};
use crate::geocode_cache::GeocodeCache;
use crate::model::{Destination, Origin};
use crate::ranking::{rank_with, RankOptions, RankedResult};
use crate::resolver::{AddressResolver, TechnicianRecord};
use crate::summary::{group_summaries, GroupSummary};
use crate::traits::{Geocoder, RequestGate, RoutingBackend};

/// Origins resolved from a roster, with everything that went wrong.
#[derive(Debug, Clone, Default)]
pub struct GeocodedRoster {
    pub origins: Vec<Origin>,
    pub warnings: Vec<BatchWarning>,
    pub newly_cached: usize,
}

/// Resolve a whole roster against the cache stored at `cache_path`.
///
/// An unreadable cache is replaced by an in-memory one and reported. The
/// cache file is written once, only when new addresses were geocoded.
pub fn geocode_roster<G: Geocoder, R: RequestGate>(
    resolver: &mut AddressResolver<G, R>,
    records: &[TechnicianRecord],
    cache_path: Option<&Path>,
) -> GeocodedRoster {
    let mut warnings = Vec::new();
    let mut cache = match cache_path {
        Some(path) => GeocodeCache::try_load(path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, path = %path.display(), "geocode cache unreadable, continuing in memory");
            warnings.push(BatchWarning::CacheIo(err.to_string()));
            GeocodeCache::in_memory()
        }),
        None => GeocodeCache::in_memory(),
    };

    let resolution = resolver.resolve_roster(records, &mut cache);

    if resolution.newly_cached > 0 {
        if let Err(err) = cache.flush() {
            tracing::warn!(error = %err, "geocode cache not saved");
            warnings.push(BatchWarning::CacheIo(err.to_string()));
        }
    }

    warnings.extend(resolution.failures.into_iter().map(|skipped| BatchWarning::Skipped {
        item: skipped.name,
        reason: skipped.reason.to_string(),
    }));

    GeocodedRoster {
        origins: resolution.resolved,
        warnings,
        newly_cached: resolution.newly_cached,
    }
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub destination: Destination,
    pub ranked: Vec<RankedResult>,
    pub groups: Vec<GroupSummary>,
    /// False when every route in this run is a straight-line estimate.
    pub backend_available: bool,
    #[serde(skip)]
    pub warnings: Vec<BatchWarning>,
}

impl Analysis {
    pub fn best(&self) -> Option<&RankedResult> {
        self.ranked.first()
    }
}

pub struct AnalysisSession<B> {
    provider: DistanceProvider<B>,
    options: RankOptions,
    availability: BackendAvailability,
    destination: Option<Destination>,
    last: Option<Analysis>,
}

impl<B: RoutingBackend> AnalysisSession<B> {
    pub fn new(provider: DistanceProvider<B>) -> Self {
        Self {
            provider,
            options: RankOptions::default(),
            availability: BackendAvailability::new(),
            destination: None,
            last: None,
        }
    }

    pub fn with_options(mut self, options: RankOptions) -> Self {
        self.options = options;
        self
    }

    pub fn provider(&self) -> &DistanceProvider<B> {
        &self.provider
    }

    pub fn select_destination(&mut self, destination: Destination) {
        self.destination = Some(destination);
    }

    pub fn clear_destination(&mut self) {
        self.destination = None;
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Probe result, memoized until [`AnalysisSession::refresh`].
    pub fn backend_available(&mut self) -> bool {
        self.availability.is_available(&self.provider)
    }

    /// Rank `origins` against the selected destination.
    ///
    /// When the backend probe fails the whole run uses fallback routes and
    /// carries a [`BatchWarning::BackendUnavailable`].
    pub fn analyse(&mut self, origins: &[Origin], rates: &CostRates) -> Result<&Analysis, AnalysisError> {
        if origins.is_empty() {
            return Err(AnalysisError::NoOrigins);
        }
        let destination = self.destination.clone().ok_or(AnalysisError::NoDestination)?;
        rates.validate()?;

        let available = self.backend_available();
        let mut warnings = Vec::new();
        if !available {
            warnings.push(BatchWarning::BackendUnavailable);
        }

        let ranked = rank_with(&self.provider, origins, &destination, rates, !available, &self.options)?;
        let groups = group_summaries(&ranked);
        tracing::info!(
            destination = %destination.name,
            origins = origins.len(),
            ranked = ranked.len(),
            backend_available = available,
            "analysis complete"
        );

        Ok(&*self.last.insert(Analysis {
            destination,
            ranked,
            groups,
            backend_available: available,
            warnings,
        }))
    }

    pub fn last_analysis(&self) -> Option<&Analysis> {
        self.last.as_ref()
    }

    /// Forget the probe result and the last analysis. The selected
    /// destination is kept.
    pub fn refresh(&mut self) {
        self.availability.invalidate();
        self.last = None;
        tracing::debug!("session refreshed");
    }
}
