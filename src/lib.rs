//! dispatch-planner core
//!
//! Ranks field technicians and workshops against a destination by road
//! distance and travel cost, falling back to straight-line estimates when
//! the routing service is unreachable.

pub mod config;
pub mod cost;
pub mod distance;
pub mod error;
pub mod geocode_cache;
pub mod haversine;
pub mod model;
pub mod nominatim;
pub mod osrm;
pub mod polyline;
pub mod ranking;
pub mod rate_limit;
pub mod report;
pub mod resolver;
pub mod roster;
pub mod session;
pub mod summary;
pub mod traits;

pub use config::EngineConfig;
pub use cost::{cost, CostBreakdown, CostRates};
pub use distance::{BackendAvailability, DistanceProvider, RetryPolicy};
pub use error::{AnalysisError, BatchWarning};
pub use model::{Coordinate, Destination, Origin, OriginKind, Route, RouteSource};
pub use ranking::{rank, RankedResult};
pub use session::{Analysis, AnalysisSession};
