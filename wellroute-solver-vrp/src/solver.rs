//! [`RouteOptimizer`] implementation running the full pipeline.

use std::time::Instant;

use log::{info, warn};
use wellroute_core::{
    Diagnostics, OptimizationRequest, OptimizationResponse, RouteOptimizer, SolveError,
};

use crate::engine::RoutingModel;
use crate::interpret::interpret;
use crate::vrp::{SearchOutcome, SearchParameters, VrpSearch};
use crate::warm_start::{build_warm_start, evaluate_seed};

/// Route optimiser backed by a `vrp-core` metaheuristic.
///
/// The optimiser holds no state between calls: every request builds its own
/// problem model, routing model and random source, seeded from
/// [`wellroute_core::SearchSettings::seed`]. The returned route never
/// collects less value than the feasible prefix of its seed.
///
/// # Examples
///
/// ```
/// use wellroute_core::{OptimizationRequest, RouteOptimizer};
/// use wellroute_solver_vrp::VrpRouteOptimizer;
///
/// let request = OptimizationRequest::new(vec![vec![0, 5], vec![5, 0]], vec![0, 100])
///     .with_stop_time_minutes(0)
///     .with_max_travel_time_minutes(100);
/// let response = VrpRouteOptimizer::new().optimize(&request)?;
/// assert_eq!(response.route(), &[0, 1, 0]);
/// assert_eq!(response.addressed_value, 100);
/// # Ok::<(), wellroute_core::SolveError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct VrpRouteOptimizer;

impl VrpRouteOptimizer {
    /// Construct the optimiser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RouteOptimizer for VrpRouteOptimizer {
    fn optimize(&self, request: &OptimizationRequest) -> Result<OptimizationResponse, SolveError> {
        let started_at = Instant::now();
        let problem = request.validate()?;
        let params = SearchParameters::try_from(&request.search)?;

        let seed = request
            .initial_route
            .clone()
            .unwrap_or_else(|| build_warm_start(&problem));
        let naive = evaluate_seed(&problem, &seed);
        let seeded =
            RoutingModel::build(&problem, request.drop_penalty_factor).read_assignment(&seed)?;

        let outcome = VrpSearch::new(params).run(&seeded)?;
        let stop_reason = outcome.stop_reason();
        let mut solution = interpret(seeded.routing(), &outcome)?;
        if naive.addressed_value > solution.addressed_value {
            warn!(
                "search result collects {} value, below the seed's {}; keeping the seed",
                solution.addressed_value, naive.addressed_value
            );
            let fallback = SearchOutcome::Solved {
                assignment: seeded.initial_assignment(),
                stop_reason,
            };
            solution = interpret(seeded.routing(), &fallback)?;
        }

        info!(
            "visited {} of {} wells for {} value in {} minutes ({:?}, {})",
            solution.route.len().saturating_sub(2),
            problem.node_count().saturating_sub(1),
            solution.addressed_value,
            solution.total_time_minutes,
            solution.status,
            stop_reason
        );

        Ok(OptimizationResponse {
            routes: vec![solution.route],
            addressed_value: solution.addressed_value,
            total_time_minutes: solution.total_time_minutes,
            status: solution.status,
            objective: solution.objective,
            dropped_nodes: solution.dropped_nodes,
            visits: solution.visits,
            naive,
            diagnostics: Diagnostics {
                solve_time: started_at.elapsed(),
                stop_reason,
            },
        })
    }
}
