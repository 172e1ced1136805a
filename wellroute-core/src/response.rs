//! Optimisation results returned to callers.

use std::fmt;
use std::time::Duration;

/// Terminal status of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolutionStatus {
    /// A feasible route was found.
    Solved,
    /// No route satisfies the time budget, even with every optional node
    /// dropped.
    Infeasible,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// The wall-clock budget ran out.
    TimeLimit,
    /// The generation cap was reached.
    IterationLimit,
    /// The best objective stayed flat for the whole stagnation window.
    Stagnation,
    /// The best route matches a provable lower bound.
    LowerBound,
    /// The search never started because the problem is infeasible.
    Infeasible,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TimeLimit => "time limit",
            Self::IterationLimit => "iteration limit",
            Self::Stagnation => "stagnation",
            Self::LowerBound => "lower bound reached",
            Self::Infeasible => "infeasible",
        };
        f.write_str(text)
    }
}

/// Running totals at one stop of the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    /// Node visited.
    pub node: usize,
    /// Time dimension value on arrival.
    pub cumulative_time_minutes: u64,
    /// Value collected up to and including this stop.
    pub cumulative_value: u64,
}

/// What the warm-start ordering achieves without any search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NaiveRoute {
    /// Longest feasible prefix of the seed, depot at both ends.
    pub route: Vec<usize>,
    /// Value collected by that prefix.
    pub addressed_value: u64,
    /// Elapsed time of that prefix, return to the depot included.
    pub total_time_minutes: u64,
}

/// Solver telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// Wall-clock time spent in the optimiser.
    pub solve_time: Duration,
    /// Why the search stopped.
    pub stop_reason: StopReason,
}

/// Result of [`crate::RouteOptimizer::optimize`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResponse {
    /// One node sequence per vehicle, depot at both ends. Empty when
    /// infeasible.
    pub routes: Vec<Vec<usize>>,
    /// Sum of the value weights of visited nodes.
    pub addressed_value: u64,
    /// Time dimension value on return to the depot.
    pub total_time_minutes: u64,
    /// Terminal status.
    pub status: SolutionStatus,
    /// Arc costs plus drop penalties of the returned route.
    pub objective: u64,
    /// Non-depot nodes left out of the route, ascending.
    pub dropped_nodes: Vec<usize>,
    /// Running totals along the route.
    pub visits: Vec<Visit>,
    /// Baseline obtained from the seed alone.
    pub naive: NaiveRoute,
    /// Solver telemetry.
    pub diagnostics: Diagnostics,
}

impl OptimizationResponse {
    /// The single vehicle's route, or an empty slice when infeasible.
    #[must_use]
    pub fn route(&self) -> &[usize] {
        self.routes.first().map(Vec::as_slice).unwrap_or_default()
    }

    /// Non-depot nodes on the route, in visit order.
    #[must_use]
    pub fn visited_nodes(&self) -> &[usize] {
        let route = self.route();
        route.get(1..route.len().saturating_sub(1)).unwrap_or(&[])
    }
}
