//! Turning a search outcome into routes, running totals and dropped nodes.

use wellroute_core::{SolutionStatus, SolveError, Visit};

use crate::engine::{Assignment, RoutingModel};
use crate::vrp::SearchOutcome;

/// A search outcome expressed in problem terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// Depot, visited nodes, depot; `[depot]` when nothing is visited and
    /// empty when infeasible.
    pub route: Vec<usize>,
    /// Running totals at each stop of `route`.
    pub visits: Vec<Visit>,
    /// Value weight collected by the visited nodes.
    pub addressed_value: u64,
    /// Time dimension value on return to the depot.
    pub total_time_minutes: u64,
    /// Non-depot nodes off the route, ascending.
    pub dropped_nodes: Vec<usize>,
    /// Arc costs plus drop penalties, saturating at `u64::MAX`.
    pub objective: u64,
    /// Terminal status.
    pub status: SolutionStatus,
}

/// Read the route out of `outcome`.
///
/// # Errors
///
/// Returns [`SolveError::Internal`] when the successor chain does not lead
/// from the start to the end of the route, or when the route breaks the time
/// budget.
pub fn interpret(
    routing: &RoutingModel<'_>,
    outcome: &SearchOutcome,
) -> Result<Interpretation, SolveError> {
    match outcome {
        SearchOutcome::Solved { assignment, .. } => solved(routing, assignment),
        SearchOutcome::Infeasible => Ok(infeasible(routing)),
    }
}

fn solved(routing: &RoutingModel<'_>, assignment: &Assignment) -> Result<Interpretation, SolveError> {
    let manager = routing.manager();
    let problem = routing.problem();
    let depot = routing.depot();

    let mut visits = vec![Visit {
        node: depot,
        cumulative_time_minutes: 0,
        cumulative_value: 0,
    }];
    let mut visited = Vec::new();
    let mut time = 0_u64;
    let mut value = 0_u64;
    let mut index = manager.start_index();
    while index != manager.end_index() {
        if visits.len() > manager.index_count() {
            return Err(internal("successor chain loops before the route end"));
        }
        let next = assignment
            .successor(index)
            .filter(|&next| next != index)
            .ok_or_else(|| internal(format!("routing index {index} has no successor")))?;
        let node = manager
            .node_of(next)
            .ok_or_else(|| internal(format!("routing index {next} is outside the model")))?;
        time = time.saturating_add(routing.arc_cost().transit(manager, index, next));
        if next != manager.end_index() {
            value = value.saturating_add(problem.value_weight(node));
            visited.push(node);
        }
        visits.push(Visit {
            node,
            cumulative_time_minutes: time,
            cumulative_value: value,
        });
        index = next;
    }

    if !routing.dimension().admits(time) {
        return Err(internal(format!(
            "route takes {time} minutes, beyond the {} minute budget",
            routing.dimension().capacity()
        )));
    }
    if visited.is_empty() {
        visits.truncate(1);
    }

    let route = visits.iter().map(|visit| visit.node).collect();
    Ok(Interpretation {
        route,
        visits,
        addressed_value: value,
        total_time_minutes: time,
        dropped_nodes: dropped(routing, &visited),
        objective: saturate(routing.objective(&visited)),
        status: SolutionStatus::Solved,
    })
}

fn infeasible(routing: &RoutingModel<'_>) -> Interpretation {
    Interpretation {
        route: Vec::new(),
        visits: Vec::new(),
        addressed_value: 0,
        total_time_minutes: 0,
        dropped_nodes: dropped(routing, &[]),
        objective: saturate(routing.objective(&[])),
        status: SolutionStatus::Infeasible,
    }
}

fn dropped(routing: &RoutingModel<'_>, visited: &[usize]) -> Vec<usize> {
    let problem = routing.problem();
    let mut on_route = vec![false; problem.node_count()];
    for &node in visited {
        if let Some(flag) = on_route.get_mut(node) {
            *flag = true;
        }
    }
    problem
        .non_depot_nodes()
        .filter(|&node| !on_route.get(node).copied().unwrap_or(false))
        .collect()
}

fn saturate(objective: u128) -> u64 {
    u64::try_from(objective).unwrap_or(u64::MAX)
}

fn internal(message: impl Into<String>) -> SolveError {
    SolveError::Internal {
        message: message.into(),
    }
}
