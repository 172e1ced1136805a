//! Seed routes built from value weights alone.

use std::cmp::Reverse;
use std::iter;

use wellroute_core::{NaiveRoute, ProblemModel};

use crate::engine::{ArcCost, TimeDimension};

/// Order non-depot nodes by descending value weight.
///
/// Ties keep ascending node order, so the seed is deterministic. The result
/// ignores the time budget; [`evaluate_seed`] reports how much of it fits.
///
/// # Examples
///
/// ```
/// use wellroute_core::{ProblemModel, RouteLimits};
/// use wellroute_solver_vrp::build_warm_start;
///
/// let model = ProblemModel::new(vec![vec![0; 4]; 4], vec![0, 5, 9, 5], RouteLimits::default())?;
/// assert_eq!(build_warm_start(&model), vec![2, 1, 3]);
/// # Ok::<(), wellroute_core::ValidationError>(())
/// ```
#[must_use]
pub fn build_warm_start(model: &ProblemModel) -> Vec<usize> {
    let mut order: Vec<usize> = (0..model.node_count()).collect();
    order.sort_by_key(|&node| Reverse(model.value_weight(node)));
    order.retain(|&node| node != model.depot());
    order
}

/// What `seed` achieves by itself: its longest time-feasible prefix, the
/// value that prefix collects and the time it takes.
#[must_use]
pub fn evaluate_seed(model: &ProblemModel, seed: &[usize]) -> NaiveRoute {
    let cost = ArcCost::new(model);
    let dimension = TimeDimension::new(model.max_travel_time_minutes());
    let depot = model.depot();
    let prefix = dimension.feasible_prefix(&cost, depot, seed);
    let kept = seed.get(..prefix.len).unwrap_or_default();
    let route = if kept.is_empty() {
        vec![depot]
    } else {
        iter::once(depot)
            .chain(kept.iter().copied())
            .chain(iter::once(depot))
            .collect()
    };
    NaiveRoute {
        route,
        addressed_value: kept
            .iter()
            .map(|&node| model.value_weight(node))
            .fold(0, u64::saturating_add),
        total_time_minutes: prefix.total_time,
    }
}
