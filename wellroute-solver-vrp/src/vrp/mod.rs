//! Route search on top of `vrp-core`.
//!
//! The seeded routing model is restated as a `vrp-core` problem
//! ([`problem`]), the feasible seed prefix becomes the first individual of the
//! population, and the solver runs single-threaded on a [`SeededRandom`] with
//! its static heuristic so a fixed seed replays the same search. The wall
//! clock always bounds the run; the generation cap and the stagnation window
//! apply only when the request sets them.

mod params;
mod problem;
mod random;

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, trace, warn};
use vrp_core::prelude::*;
use vrp_core::solver::get_static_heuristic;
use vrp_core::utils::{Environment, Parallelism};
use wellroute_core::{SolveError, StopReason};

use crate::engine::{Assignment, SeededModel};

pub use params::SearchParameters;
pub use random::SeededRandom;

use problem::WellProblem;

/// Terminal state of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The best feasible route found.
    Solved {
        /// Successor chain of the best route.
        assignment: Assignment,
        /// Why the search stopped.
        stop_reason: StopReason,
    },
    /// Not even the depot-only route fits the time budget.
    Infeasible,
}

impl SearchOutcome {
    /// Why the search stopped.
    #[must_use]
    pub const fn stop_reason(&self) -> StopReason {
        match self {
            Self::Solved { stop_reason, .. } => *stop_reason,
            Self::Infeasible => StopReason::Infeasible,
        }
    }
}

/// Search driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct VrpSearch {
    params: SearchParameters,
}

impl VrpSearch {
    /// A search bounded by `params`.
    #[must_use]
    pub const fn new(params: SearchParameters) -> Self {
        Self { params }
    }

    /// Search from the seeded route until a stopping rule fires.
    ///
    /// A seed whose objective already matches the lower bound is returned
    /// without starting the solver.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Internal`] when `vrp-core` rejects the problem
    /// or fails while solving it.
    pub fn run(&self, seeded: &SeededModel<'_>) -> Result<SearchOutcome, SolveError> {
        let routing = seeded.routing();
        let home_only = routing.arc_cost().route_cost(routing.depot(), &[]);
        if !routing.dimension().admits(home_only) {
            warn!("no route fits the {} minute budget", routing.dimension().capacity());
            return Ok(SearchOutcome::Infeasible);
        }

        let lower_bound = routing.lower_bound();
        let seed_objective = routing.objective(seeded.initial_route());
        if seed_objective <= lower_bound {
            debug!("seed objective {seed_objective} already meets the lower bound");
            return Ok(SearchOutcome::Solved {
                assignment: seeded.initial_assignment(),
                stop_reason: StopReason::LowerBound,
            });
        }

        debug!("route search starting at objective {seed_objective} (lower bound {lower_bound})");
        let started_at = Instant::now();
        let nodes = self.solve(seeded).map_err(|err| SolveError::Internal {
            message: format!("vrp-core: {err}"),
        })?;
        let objective = routing.objective(&nodes);
        let stop_reason = self.stop_reason(objective, lower_bound, started_at.elapsed());
        debug!("route search stopped ({stop_reason}) at objective {objective}");

        Ok(SearchOutcome::Solved {
            assignment: Assignment::from_route(routing.manager(), &nodes),
            stop_reason,
        })
    }

    fn solve(&self, seeded: &SeededModel<'_>) -> GenericResult<Vec<usize>> {
        let model = WellProblem::build(seeded.routing())?;
        let problem = model.problem().clone();
        let environment = Arc::new(Environment {
            random: Arc::new(SeededRandom::new(self.params.seed)),
            parallelism: Parallelism::new_with_cpus(1),
            logger: Arc::new(|message: &str| trace!("{message}")),
            ..Environment::default()
        });
        let initial = model.initial_solution(seeded.initial_route(), &environment)?;

        let config = VrpConfigBuilder::new(problem.clone())
            .set_environment(environment.clone())
            .prebuild()?
            .with_heuristic(Box::new(get_static_heuristic(problem.clone(), environment)))
            .with_init_solutions(vec![initial], Some(1))
            .with_max_time(Some(self.params.time_limit_seconds()))
            .with_max_generations(self.params.generation_cap())
            .with_min_cv(
                self.params
                    .stagnation_window()
                    .map(|window| (String::from("sample"), window, 0.0, true)),
                String::from("stagnation"),
            )
            .build()?;

        let solution = Solver::new(problem, config).solve()?;
        Ok(model.visited_nodes(&solution))
    }

    fn stop_reason(&self, objective: u128, lower_bound: u128, elapsed: Duration) -> StopReason {
        if objective <= lower_bound {
            StopReason::LowerBound
        } else if elapsed >= self.params.time_limit {
            StopReason::TimeLimit
        } else if self.params.stagnation_window().is_some() {
            StopReason::Stagnation
        } else {
            StopReason::IterationLimit
        }
    }
}
