//! Address resolution for technician records.
//!
//! A record either carries explicit coordinates or an address that is looked
//! up in the [`GeocodeCache`] and, on a miss, geocoded behind a
//! [`RequestGate`].

use serde::{Deserialize, Serialize};

use crate::error::ResolutionFailure;
use crate::geocode_cache::GeocodeCache;
use crate::model::{Coordinate, Origin};
use crate::traits::{Geocoder, RequestGate};

/// Spreadsheet placeholders that mean "no value".
const NOT_AVAILABLE: &[&str] = &["nan", "none", "null", "n/a", "na", "-"];

/// One technician row as supplied by the roster loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicianRecord {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// Explicit `"lat, lon"` override.
    pub coordinates: String,
    /// Home workshop.
    pub group: String,
}

impl TechnicianRecord {
    pub fn display_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Street, postal code and city joined by spaces, skipping blanks and
    /// placeholders. `None` when nothing is left.
    pub fn address(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.street, &self.postal_code, &self.city]
            .into_iter()
            .map(|field| field.trim())
            .filter(|field| is_present(field))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    fn explicit_coordinates(&self) -> Option<Coordinate> {
        let raw = self.coordinates.trim();
        if !is_present(raw) {
            return None;
        }
        match raw.parse() {
            Ok(coord) => Some(coord),
            Err(err) => {
                tracing::warn!(technician = %self.display_name(), error = %err, "ignoring explicit coordinates");
                None
            }
        }
    }
}

pub(crate) fn is_present(field: &str) -> bool {
    let field = field.trim();
    !field.is_empty() && !NOT_AVAILABLE.iter().any(|na| field.eq_ignore_ascii_case(na))
}

/// A record that could not be placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    pub name: String,
    pub reason: ResolutionFailure,
}

/// Outcome of resolving a whole roster.
#[derive(Debug, Clone, Default)]
pub struct RosterResolution {
    pub resolved: Vec<Origin>,
    pub failures: Vec<SkippedRecord>,
    /// Addresses geocoded over the network during this batch.
    pub newly_cached: usize,
}

pub struct AddressResolver<G, R> {
    geocoder: G,
    gate: R,
    network_calls: usize,
}

impl<G: Geocoder, R: RequestGate> AddressResolver<G, R> {
    pub fn new(geocoder: G, gate: R) -> Self {
        Self {
            geocoder,
            gate,
            network_calls: 0,
        }
    }

    /// Number of geocoding requests sent so far.
    pub fn network_calls(&self) -> usize {
        self.network_calls
    }

    /// Coordinate for one record.
    pub fn resolve(
        &mut self,
        record: &TechnicianRecord,
        cache: &mut GeocodeCache,
    ) -> Result<Coordinate, ResolutionFailure> {
        if let Some(coord) = record.explicit_coordinates() {
            return Ok(coord);
        }

        let address = record.address().ok_or(ResolutionFailure::NoAddress)?;
        self.resolve_address(&address, cache)
    }

    fn resolve_address(
        &mut self,
        address: &str,
        cache: &mut GeocodeCache,
    ) -> Result<Coordinate, ResolutionFailure> {
        if let Some(coord) = cache.get(address) {
            return Ok(coord);
        }

        self.gate.acquire();
        self.network_calls += 1;
        match self.geocoder.geocode(address) {
            Ok(coord) => {
                cache.put(address, coord);
                Ok(coord)
            }
            Err(err) => Err(ResolutionFailure::GeocodeFailed(err.to_string())),
        }
    }

    /// Resolve every record. Failures are collected, never fatal.
    ///
    /// The cache is updated in memory only; flush it once afterwards.
    pub fn resolve_roster(
        &mut self,
        records: &[TechnicianRecord],
        cache: &mut GeocodeCache,
    ) -> RosterResolution {
        let calls_before = self.network_calls;
        let cached_before = cache.len();
        let mut resolution = RosterResolution::default();

        for record in records {
            let name = record.display_name();
            match self.resolve(record, cache) {
                Ok(location) => {
                    let address = record.address().unwrap_or_default();
                    resolution
                        .resolved
                        .push(Origin::technician(name, record.group.trim(), location, address));
                }
                Err(reason) => {
                    tracing::warn!(technician = %name, %reason, "technician skipped");
                    resolution.failures.push(SkippedRecord { name, reason });
                }
            }
        }

        resolution.newly_cached = cache.len() - cached_before;
        tracing::info!(
            resolved = resolution.resolved.len(),
            skipped = resolution.failures.len(),
            geocoded = self.network_calls - calls_before,
            "roster resolved"
        );
        resolution
    }
}
