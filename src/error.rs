//! Error taxonomy for the dispatch planner.
//!
//! Per-item failures (a row without an address, a route that fell back) are
//! collected and reported once per batch. Only [`AnalysisError`] stops a batch.

use std::fmt;

use thiserror::Error;

/// A coordinate outside WGS84 bounds or an unparsable coordinate string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),

    #[error("expected \"<lat>, <lon>\", got {0:?}")]
    Format(String),
}

/// Failure of a single routing backend call.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The request did not complete within the client timeout. Worth retrying.
    #[error("routing request timed out")]
    Timeout,

    #[error("routing backend returned HTTP {0}")]
    Status(u16),

    /// The payload parsed but reported a non-"Ok" code.
    #[error("routing backend answered with code {0:?}")]
    Code(String),

    #[error("routing backend returned no candidate routes")]
    NoRoute,

    #[error("malformed routing response: {0}")]
    Malformed(String),

    #[error("routing request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

impl RoutingError {
    /// Only timeouts are transient enough to retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RoutingError::Timeout)
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RoutingError::Timeout
        } else if err.is_decode() {
            RoutingError::Malformed(err.to_string())
        } else {
            RoutingError::Transport(err)
        }
    }
}

/// Failure of a single geocoding request.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request timed out")]
    Timeout,

    #[error("geocoding service error: {0}")]
    Service(String),

    #[error("no match for address {0:?}")]
    NotFound(String),

    #[error("geocoder returned an invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Service(err.to_string())
        }
    }
}

/// Why a roster row produced no coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("no usable address or coordinates")]
    NoAddress,

    #[error("geocoding failed: {0}")]
    GeocodeFailed(String),
}

/// Read or write failure on the persistent geocode cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure to read a roster or destination sheet.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("roster CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no coordinate column found in {0} sheet")]
    MissingCoordinateColumn(&'static str),
}

/// Failure writing the exported report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// An invalid cost rate.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{name} must be a finite, non-negative number (got {value})")]
pub struct RatesError {
    pub name: &'static str,
    pub value: f64,
}

/// Conditions that leave an analysis with nothing to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no origins to analyse")]
    NoOrigins,

    #[error("no destination selected")]
    NoDestination,

    #[error(transparent)]
    Rates(#[from] RatesError),

    #[error("worker pool could not be started: {0}")]
    WorkerPool(String),
}

/// Non-fatal conditions surfaced once at the end of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWarning {
    /// The availability probe failed; every route in the batch is a fallback.
    BackendUnavailable,
    /// The geocode cache could not be read or written; the run continued in memory.
    CacheIo(String),
    /// A roster row was left out.
    Skipped { item: String, reason: String },
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchWarning::BackendUnavailable => f.write_str(
                "routing backend unavailable; distances are straight-line estimates x1.3",
            ),
            BatchWarning::CacheIo(message) => write!(f, "geocode cache unavailable: {message}"),
            BatchWarning::Skipped { item, reason } => write!(f, "skipped {item}: {reason}"),
        }
    }
}
