//! Single-vehicle delivery route optimizer.
//!
//! Builds the effective-distance matrix, picks the cheapest of a few
//! time-aware nearest-neighbour tours, then refines it with bounded
//! first-improvement 2-opt. The tour is an open path: the first stop is
//! the start and there is no return leg.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::distance::TrafficModel;
use crate::error::RouteError;
use crate::matrix::DistanceMatrix;
use crate::stop::{Stop, TrafficComplexity};

/// Hours of dwell plus travel assumed per visited stop while constructing
/// a tour.
const SIMULATED_HOURS_PER_STOP: f64 = 0.5;

/// Hard cap on 2-opt sweeps, further limited to three per stop.
const MAX_TWO_OPT_SWEEPS: usize = 50;

/// Caller-owned flag to abandon a running optimization.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    pub traffic: TrafficModel,
    /// Number of leading stops tried as tour starts.
    pub candidate_starts: usize,
    pub cancellation: Option<CancellationFlag>,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            traffic: TrafficModel::default(),
            candidate_starts: 3,
            cancellation: None,
        }
    }
}

impl OptimizeOptions {
    pub fn with_traffic(traffic: TrafficModel) -> Self {
        Self {
            traffic,
            ..Self::default()
        }
    }

    fn check_cancelled(&self) -> Result<(), RouteError> {
        match &self.cancellation {
            Some(flag) if flag.is_cancelled() => Err(RouteError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Annotations for one leg of the final route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInsight {
    /// Index into the caller's stop slice.
    pub from_stop: usize,
    pub to_stop: usize,
    pub from_address: String,
    pub to_address: String,
    pub base_distance_km: f64,
    pub estimated_time_hours: f64,
    /// Harder of the two endpoint tiers, ranked
    /// `low < moderate < high < very_high` rather than alphabetically.
    pub complexity: TrafficComplexity,
    pub notes: Vec<String>,
    /// Delivery notes of the departure stop, if any.
    pub delivery_tips: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizedRoute {
    /// Visiting sequence as indices into the caller's stop slice.
    pub order: Vec<usize>,
    pub stop_ids: Vec<String>,
    pub total_distance_km: f64,
    pub insights: Vec<RouteInsight>,
    /// 2-opt sweeps performed.
    pub sweeps: usize,
}

/// Orders the resolved stops in `stops` for a departure at `departure_hour`.
///
/// Unresolved stops are skipped; indices in the result always refer to
/// positions in `stops`.
pub fn optimize(
    stops: &[Stop],
    departure_hour: u32,
    options: &OptimizeOptions,
) -> Result<OptimizedRoute, RouteError> {
    check_departure_hour(departure_hour)?;

    let usable: Vec<usize> = stops
        .iter()
        .enumerate()
        .filter(|(_, stop)| stop.is_resolved())
        .map(|(i, _)| i)
        .collect();

    if usable.len() < 2 {
        return Err(RouteError::InsufficientStops {
            usable: usable.len(),
        });
    }

    options.check_cancelled()?;

    let locations: Vec<&Stop> = usable.iter().map(|&i| &stops[i]).collect();
    let matrix = DistanceMatrix::build(&locations, &options.traffic);
    debug!(stops = matrix.len(), "built distance matrix");

    let n = locations.len();
    let mut best: Option<(Vec<usize>, f64)> = None;
    for start in 0..options.candidate_starts.clamp(1, n) {
        options.check_cancelled()?;

        let hour = departure_hour as f64;
        let (tour, cost) = nearest_neighbor(&locations, &matrix, &options.traffic, start, hour);
        debug!(start = start, cost = cost, "nearest-neighbour candidate");

        // Strict comparison keeps the earliest start on ties.
        if best.as_ref().is_none_or(|(_, best_cost)| cost < *best_cost) {
            best = Some((tour, cost));
        }
    }

    let Some((tour, total)) = best else {
        return Err(RouteError::InsufficientStops { usable: n });
    };

    let (tour, total, sweeps) = refine(tour, total, &matrix, sweep_limit(n), options)?;

    let insights = route_insights(&locations, &usable, &tour, &matrix);
    let order: Vec<usize> = tour.iter().map(|&position| usable[position]).collect();
    let stop_ids = order.iter().map(|&i| stops[i].id.clone()).collect();

    Ok(OptimizedRoute {
        order,
        stop_ids,
        total_distance_km: total,
        insights,
        sweeps,
    })
}

/// Rejects hours outside 0-23.
pub fn check_departure_hour(departure_hour: u32) -> Result<(), RouteError> {
    if departure_hour > 23 {
        return Err(RouteError::MalformedInput(format!(
            "departure hour must be between 0 and 23, got {}",
            departure_hour
        )));
    }
    Ok(())
}

/// Maximum 2-opt sweeps for a tour of `n` stops.
pub fn sweep_limit(n: usize) -> usize {
    MAX_TWO_OPT_SWEEPS.min(3 * n)
}

/// Greedy tour from `start`, choosing the next stop by penalized cost.
///
/// Returns the tour and its unpenalized matrix cost.
fn nearest_neighbor(
    stops: &[&Stop],
    matrix: &DistanceMatrix,
    traffic: &TrafficModel,
    start: usize,
    departure_hour: f64,
) -> (Vec<usize>, f64) {
    let n = stops.len();
    let mut visited = vec![false; n];
    let mut tour = Vec::with_capacity(n);
    let mut total = 0.0;
    let mut current = start;
    let mut hour = departure_hour;

    visited[current] = true;
    tour.push(current);

    while tour.len() < n {
        let mut nearest: Option<(usize, f64)> = None;
        for candidate in (0..n).filter(|&node| !visited[node]) {
            let penalty = traffic.time_penalty(stops[current], stops[candidate], hour);
            let adjusted = matrix.cost(current, candidate) * penalty;
            if nearest.is_none_or(|(_, best)| adjusted < best) {
                nearest = Some((candidate, adjusted));
            }
        }

        let Some((next, _)) = nearest else {
            break;
        };
        total += matrix.cost(current, next);
        visited[next] = true;
        tour.push(next);
        current = next;
        hour += SIMULATED_HOURS_PER_STOP;
    }

    (tour, total)
}

/// Applies at most one first-improvement 2-opt move per sweep, for up to
/// `max_sweeps` sweeps. Returns the tour, its cost and the sweeps used.
fn refine(
    mut tour: Vec<usize>,
    mut total: f64,
    matrix: &DistanceMatrix,
    max_sweeps: usize,
    options: &OptimizeOptions,
) -> Result<(Vec<usize>, f64, usize), RouteError> {
    let mut sweeps = 0;
    while sweeps < max_sweeps {
        options.check_cancelled()?;
        sweeps += 1;

        match two_opt_first_improvement(&tour, total, matrix) {
            Some((improved, cost)) => {
                debug!(sweep = sweeps, from = total, to = cost, "applied 2-opt move");
                tour = improved;
                total = cost;
            }
            None => break,
        }
    }
    Ok((tour, total, sweeps))
}

/// One 2-opt sweep. Scans segment reversals `tour[i..=k]` with the start
/// fixed and returns the first that strictly lowers the path cost.
fn two_opt_first_improvement(
    tour: &[usize],
    current_cost: f64,
    matrix: &DistanceMatrix,
) -> Option<(Vec<usize>, f64)> {
    let n = tour.len();
    for i in 1..n {
        for k in i + 1..n {
            let mut candidate = tour.to_vec();
            candidate[i..=k].reverse();

            let cost = matrix.path_cost(&candidate);
            if cost < current_cost {
                return Some((candidate, cost));
            }
        }
    }
    None
}

fn route_insights(
    stops: &[&Stop],
    usable: &[usize],
    tour: &[usize],
    matrix: &DistanceMatrix,
) -> Vec<RouteInsight> {
    tour.windows(2)
        .map(|leg| {
            let (from, to) = (leg[0], leg[1]);
            let entry = matrix.entry(from, to);
            let origin = stops[from];
            let destination = stops[to];

            RouteInsight {
                from_stop: usable[from],
                to_stop: usable[to],
                from_address: origin.address.clone(),
                to_address: destination.address.clone(),
                base_distance_km: entry.base_distance_km,
                estimated_time_hours: entry.estimated_time_hours,
                complexity: origin.traffic_complexity.max(destination.traffic_complexity),
                notes: entry.notes.clone(),
                delivery_tips: (!origin.delivery_notes.is_empty())
                    .then(|| origin.delivery_notes.clone()),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(id: &str, lat: f64, lng: f64) -> Stop {
        Stop::resolved(id, id, lat, lng)
    }

    fn matrix_for(stops: &[Stop]) -> (Vec<&Stop>, DistanceMatrix) {
        let refs: Vec<&Stop> = stops.iter().collect();
        let matrix = DistanceMatrix::build(&refs, &TrafficModel::default());
        (refs, matrix)
    }

    #[test]
    fn sweep_limit_caps_at_fifty() {
        assert_eq!(sweep_limit(2), 6);
        assert_eq!(sweep_limit(16), 48);
        assert_eq!(sweep_limit(17), 50);
        assert_eq!(sweep_limit(400), 50);
    }

    #[test]
    fn nearest_neighbor_walks_a_line_in_order() {
        let stops: Vec<Stop> = (0..5)
            .map(|i| plain(&format!("s{}", i), 6.40 + 0.01 * i as f64, 3.40))
            .collect();
        let (refs, matrix) = matrix_for(&stops);

        let (tour, cost) = nearest_neighbor(&refs, &matrix, &TrafficModel::default(), 0, 12.0);
        assert_eq!(tour, vec![0, 1, 2, 3, 4]);
        assert_eq!(cost, matrix.path_cost(&tour));
    }

    #[test]
    fn nearest_neighbor_breaks_ties_by_index() {
        let stops = vec![
            plain("a", 6.5, 3.4),
            plain("b", 6.5, 3.4),
            plain("c", 6.5, 3.4),
        ];
        let (refs, matrix) = matrix_for(&stops);

        let (tour, cost) = nearest_neighbor(&refs, &matrix, &TrafficModel::default(), 1, 8.0);
        assert_eq!(tour, vec![1, 0, 2]);
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn rush_penalty_steers_construction() {
        // From a moderate start, the very_high stop (factor 1.8) is 0.010
        // degrees east and the moderate stop (factor 1.3) 0.015 west.
        // Off-peak the very_high stop is cheaper; in rush hour its 2.5x
        // penalty outweighs the moderate stop's 1.4x.
        let stops = vec![
            plain("Ojota", 6.50, 3.40),
            Stop::resolved("apapa", "Apapa wharf", 6.50, 3.41),
            plain("Ketu", 6.50, 3.385),
        ];
        let (refs, matrix) = matrix_for(&stops);
        let traffic = TrafficModel::default();
        assert!(matrix.cost(0, 1) < matrix.cost(0, 2));

        let (off_peak, _) = nearest_neighbor(&refs, &matrix, &traffic, 0, 13.0);
        let (rush, _) = nearest_neighbor(&refs, &matrix, &traffic, 0, 8.0);
        assert_eq!(off_peak, vec![0, 1, 2]);
        assert_eq!(rush, vec![0, 2, 1]);
    }

    #[test]
    fn two_opt_untangles_crossing() {
        // Visiting 0 -> 2 -> 1 -> 3 along a line backtracks; reversing the
        // middle segment removes it.
        let stops: Vec<Stop> = (0..4)
            .map(|i| plain(&format!("s{}", i), 6.40 + 0.01 * i as f64, 3.40))
            .collect();
        let (_, matrix) = matrix_for(&stops);
        let tangled = vec![0, 2, 1, 3];
        let cost = matrix.path_cost(&tangled);

        let (improved, new_cost) = two_opt_first_improvement(&tangled, cost, &matrix).unwrap();
        assert_eq!(improved, vec![0, 1, 2, 3]);
        assert!(new_cost < cost);
    }

    #[test]
    fn two_opt_keeps_start_fixed() {
        let stops: Vec<Stop> = (0..4)
            .map(|i| plain(&format!("s{}", i), 6.40 + 0.01 * i as f64, 3.40))
            .collect();
        let (_, matrix) = matrix_for(&stops);
        // Starting in the middle of the line is suboptimal but the start
        // never moves.
        let mut tour = vec![2, 0, 1, 3];
        let mut cost = matrix.path_cost(&tour);
        while let Some((next, next_cost)) = two_opt_first_improvement(&tour, cost, &matrix) {
            assert!(next_cost < cost);
            assert_eq!(next[0], 2);
            tour = next;
            cost = next_cost;
        }
        assert_eq!(tour[0], 2);
    }

    #[test]
    fn two_opt_rejects_equal_cost_moves() {
        let stops = vec![plain("a", 6.5, 3.4), plain("b", 6.5, 3.4), plain("c", 6.5, 3.4)];
        let (_, matrix) = matrix_for(&stops);
        assert!(two_opt_first_improvement(&[0, 1, 2], 0.0, &matrix).is_none());
    }

    #[test]
    fn refine_stops_at_sweep_cap() {
        // Two backtracks on a line: 0 -> 2 -> 1 and 3 -> 5 -> 4. Each needs
        // its own move, so a single sweep leaves the second in place.
        let stops: Vec<Stop> = (0..6)
            .map(|i| plain(&format!("s{}", i), 6.40 + 0.01 * i as f64, 3.40))
            .collect();
        let (_, matrix) = matrix_for(&stops);
        let tangled = vec![0, 2, 1, 3, 5, 4];
        let cost = matrix.path_cost(&tangled);
        let options = OptimizeOptions::default();

        let (tour, capped_cost, sweeps) =
            refine(tangled.clone(), cost, &matrix, 1, &options).unwrap();
        assert_eq!(sweeps, 1);
        assert_eq!(tour, vec![0, 1, 2, 3, 5, 4]);
        assert!(capped_cost < cost);
        assert!(two_opt_first_improvement(&tour, capped_cost, &matrix).is_some());

        let (tour, full_cost, sweeps) = refine(tangled, cost, &matrix, 50, &options).unwrap();
        assert_eq!(tour, vec![0, 1, 2, 3, 4, 5]);
        assert!(full_cost < capped_cost);
        // Two moves, then one sweep that finds nothing.
        assert_eq!(sweeps, 3);
    }

    #[test]
    fn refine_honours_cancellation() {
        let stops: Vec<Stop> = (0..4)
            .map(|i| plain(&format!("s{}", i), 6.40 + 0.01 * i as f64, 3.40))
            .collect();
        let (_, matrix) = matrix_for(&stops);
        let flag = CancellationFlag::new();
        flag.cancel();
        let options = OptimizeOptions {
            cancellation: Some(flag),
            ..OptimizeOptions::default()
        };

        let result = refine(vec![0, 2, 1, 3], 1.0, &matrix, 12, &options);
        assert_eq!(result, Err(RouteError::Cancelled));
    }

    #[test]
    fn departure_hour_range() {
        assert!(check_departure_hour(0).is_ok());
        assert!(check_departure_hour(23).is_ok());
        assert!(matches!(check_departure_hour(24), Err(RouteError::MalformedInput(_))));
    }

    #[test]
    fn insight_complexity_is_harder_endpoint() {
        let stops = vec![
            Stop::resolved("a", "Lekki Phase 1", 6.4474, 3.4723),
            Stop::resolved("b", "Apapa Port", 6.4489, 3.3590),
        ];
        let route = optimize(&stops, 12, &OptimizeOptions::default()).unwrap();
        assert_eq!(route.insights.len(), 1);
        assert_eq!(route.insights[0].complexity, TrafficComplexity::VeryHigh);
    }

    #[test]
    fn insight_carries_departure_delivery_notes() {
        let stops = vec![
            Stop::resolved("a", "Ikoyi Club", 6.4541, 3.4347),
            Stop::resolved("b", "Ojota", 6.58, 3.38),
        ];
        let route = optimize(&stops, 12, &OptimizeOptions::default()).unwrap();
        assert_eq!(route.order, vec![0, 1]);
        assert_eq!(
            route.insights[0].delivery_tips.as_deref(),
            Some("Elite area - security checkpoints may slow delivery")
        );
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let stops = vec![plain("a", 6.5, 3.4), plain("b", 6.6, 3.4)];
        let err = optimize(&stops, 24, &OptimizeOptions::default()).unwrap_err();
        assert!(matches!(err, RouteError::MalformedInput(_)));
    }

    #[test]
    fn cancelled_flag_aborts() {
        let stops = vec![plain("a", 6.5, 3.4), plain("b", 6.6, 3.4)];
        let flag = CancellationFlag::new();
        flag.cancel();
        let options = OptimizeOptions {
            cancellation: Some(flag),
            ..OptimizeOptions::default()
        };
        assert_eq!(optimize(&stops, 9, &options), Err(RouteError::Cancelled));
    }
}
