//! Ranking engine: route and cost every origin against one destination.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cost::{cost, CostBreakdown, CostRates};
use crate::distance::DistanceProvider;
use crate::error::AnalysisError;
use crate::model::{Destination, Origin, Route};
use crate::traits::RoutingBackend;

/// One origin's place in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub origin: Origin,
    pub route: Route,
    pub cost: CostBreakdown,
    /// 0-based position, ascending by distance.
    pub rank: usize,
    pub is_best: bool,
}

#[derive(Debug, Clone)]
pub struct RankOptions {
    /// Routing threads. 0 or 1 routes sequentially on the caller's thread.
    pub workers: usize,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

/// Rank `origins` by road distance to `destination`, sequentially.
pub fn rank<B: RoutingBackend>(
    provider: &DistanceProvider<B>,
    origins: &[Origin],
    destination: &Destination,
    rates: &CostRates,
    force_fallback: bool,
) -> Vec<RankedResult> {
    let evaluated = origins
        .iter()
        .filter_map(|origin| evaluate(provider, origin, destination, rates, force_fallback))
        .collect();
    order(evaluated)
}

/// Like [`rank`], optionally routing origins on a bounded worker pool.
///
/// Output is identical to the sequential ranking.
pub fn rank_with<B: RoutingBackend>(
    provider: &DistanceProvider<B>,
    origins: &[Origin],
    destination: &Destination,
    rates: &CostRates,
    force_fallback: bool,
    options: &RankOptions,
) -> Result<Vec<RankedResult>, AnalysisError> {
    if options.workers <= 1 {
        return Ok(rank(provider, origins, destination, rates, force_fallback));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers)
        .build()
        .map_err(|err| AnalysisError::WorkerPool(err.to_string()))?;

    // Indexed collect keeps input order, so the stable sort below breaks
    // ties exactly as the sequential path does.
    let evaluated: Vec<Option<Evaluated>> = pool.install(|| {
        origins
            .par_iter()
            .map(|origin| evaluate(provider, origin, destination, rates, force_fallback))
            .collect()
    });
    Ok(order(evaluated.into_iter().flatten().collect()))
}

struct Evaluated {
    origin: Origin,
    route: Route,
    cost: CostBreakdown,
}

fn evaluate<B: RoutingBackend>(
    provider: &DistanceProvider<B>,
    origin: &Origin,
    destination: &Destination,
    rates: &CostRates,
    force_fallback: bool,
) -> Option<Evaluated> {
    let route = provider.route(origin.location, destination.location, force_fallback);
    if !route.is_usable() {
        tracing::warn!(origin = %origin.name, "no usable route, origin excluded");
        return None;
    }
    let cost = cost(&route, rates);
    Some(Evaluated {
        origin: origin.clone(),
        route,
        cost,
    })
}

fn order(mut rows: Vec<Evaluated>) -> Vec<RankedResult> {
    rows.sort_by(|a, b| a.route.distance_km.total_cmp(&b.route.distance_km));
    rows.into_iter()
        .enumerate()
        .map(|(rank, row)| RankedResult {
            origin: row.origin,
            route: row.route,
            cost: row.cost,
            rank,
            is_best: rank == 0,
        })
        .collect()
}

/// Technicians followed by workshops as synthetic origins.
pub fn with_workshops(technicians: &[Origin], workshops: &[Destination]) -> Vec<Origin> {
    technicians
        .iter()
        .cloned()
        .chain(
            workshops
                .iter()
                .map(|workshop| Origin::workshop(workshop.name.clone(), workshop.location)),
        )
        .collect()
}
