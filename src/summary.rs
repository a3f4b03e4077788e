//! Aggregates over a ranking: per-group summaries and a straight-line
//! best-match screen across many destinations.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_km;
use crate::model::{round1, Destination, Origin};
use crate::ranking::RankedResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub count: usize,
    pub mean_distance_km: f64,
    pub mean_total_cost: f64,
}

/// Count, mean distance and mean total cost per origin group.
///
/// Groups appear in the order their best member appears in `ranked`.
pub fn group_summaries(ranked: &[RankedResult]) -> Vec<GroupSummary> {
    let mut groups: Vec<(String, usize, f64, f64)> = Vec::new();
    for row in ranked {
        let group = &row.origin.group;
        match groups.iter_mut().find(|(name, ..)| name == group) {
            Some((_, count, distance, cost)) => {
                *count += 1;
                *distance += row.route.distance_km;
                *cost += row.cost.total;
            }
            None => groups.push((group.clone(), 1, row.route.distance_km, row.cost.total)),
        }
    }

    groups
        .into_iter()
        .map(|(group, count, distance, cost)| {
            let n = count as f64;
            GroupSummary {
                group,
                count,
                mean_distance_km: round1(distance / n),
                mean_total_cost: round1(cost / n),
            }
        })
        .collect()
}

/// Nearest origin to one destination, as the crow flies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub destination: String,
    pub origin: String,
    pub group: String,
    /// Plain haversine distance, no road detour factor.
    pub straight_line_km: f64,
}

/// For every destination, the single nearest origin by plain haversine.
///
/// A cheap screening pass; the full ranking uses road routing instead.
/// Returns nothing when `origins` is empty. Ties go to the earlier origin.
pub fn best_matches(destinations: &[Destination], origins: &[Origin]) -> Vec<BestMatch> {
    if origins.is_empty() {
        return Vec::new();
    }

    destinations
        .iter()
        .filter_map(|destination| {
            let (origin, km) = origins
                .iter()
                .map(|origin| (origin, haversine_km(origin.location, destination.location)))
                .fold(None, |best: Option<(&Origin, f64)>, candidate| match best {
                    Some(current) if current.1 <= candidate.1 => Some(current),
                    _ => Some(candidate),
                })?;
            Some(BestMatch {
                destination: destination.name.clone(),
                origin: origin.name.clone(),
                group: origin.group.clone(),
                straight_line_km: round1(km),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{cost, CostRates};
    use crate::haversine::fallback_route;
    use crate::model::Coordinate;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn ranked_row(name: &str, group: &str, lat: f64, rank: usize) -> RankedResult {
        let origin = Origin::technician(name, group, coord(lat, 19.0), "");
        let route = fallback_route(origin.location, coord(50.0, 19.0));
        let cost = cost(&route, &CostRates::default());
        RankedResult {
            origin,
            route,
            cost,
            rank,
            is_best: rank == 0,
        }
    }

    #[test]
    fn test_group_summary_means() {
        let ranked = vec![
            ranked_row("a", "Kraków", 50.1, 0),
            ranked_row("b", "Tarnów", 50.2, 1),
            ranked_row("c", "Kraków", 50.3, 2),
        ];

        let summaries = group_summaries(&ranked);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].group, "Kraków");
        assert_eq!(summaries[0].count, 2);
        let expected = round1((ranked[0].route.distance_km + ranked[2].route.distance_km) / 2.0);
        assert_eq!(summaries[0].mean_distance_km, expected);
        assert_eq!(summaries[1].group, "Tarnów");
        assert_eq!(summaries[1].count, 1);
        assert_eq!(summaries[1].mean_total_cost, round1(ranked[1].cost.total));
    }

    #[test]
    fn test_group_summary_empty() {
        assert!(group_summaries(&[]).is_empty());
    }

    #[test]
    fn test_best_match_uses_plain_haversine() {
        let origins = vec![
            Origin::technician("far", "A", coord(51.0, 19.0), ""),
            Origin::technician("near", "B", coord(50.1, 19.0), ""),
        ];
        let sites = vec![Destination::site("Budowa", "K-1", coord(50.0, 19.0))];

        let matches = best_matches(&sites, &origins);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].origin, "near");
        assert_eq!(matches[0].group, "B");
        let plain = round1(haversine_km(coord(50.1, 19.0), coord(50.0, 19.0)));
        assert_eq!(matches[0].straight_line_km, plain);
        assert_eq!(plain, 11.1);
    }

    #[test]
    fn test_best_match_one_row_per_destination() {
        let origins = vec![Origin::technician("only", "A", coord(50.0, 19.0), "")];
        let sites = vec![
            Destination::site("S1", "", coord(50.0, 19.1)),
            Destination::site("S2", "", coord(49.0, 20.0)),
        ];
        let matches = best_matches(&sites, &origins);
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.origin == "only"));
    }

    #[test]
    fn test_best_match_tie_prefers_first() {
        let origins = vec![
            Origin::technician("east", "A", coord(0.0, 0.1), ""),
            Origin::technician("west", "B", coord(0.0, -0.1), ""),
        ];
        let sites = vec![Destination::site("S", "", coord(0.0, 0.0))];
        assert_eq!(
            haversine_km(origins[0].location, sites[0].location),
            haversine_km(origins[1].location, sites[0].location)
        );
        assert_eq!(best_matches(&sites, &origins)[0].origin, "east");

        let reversed: Vec<Origin> = origins.into_iter().rev().collect();
        assert_eq!(best_matches(&sites, &reversed)[0].origin, "west");
    }

    #[test]
    fn test_best_match_without_origins() {
        let sites = vec![Destination::site("S", "", coord(50.0, 19.0))];
        assert!(best_matches(&sites, &[]).is_empty());
    }
}
