//! Arc costs shared by the objective and the Time dimension.

use wellroute_core::ProblemModel;

use super::IndexManager;

/// Cost of travelling an arc: matrix minutes plus the dwell time at a stop.
///
/// Built once per problem and never mutated. The only self arc a route can
/// contain is the depot-to-depot closing arc of an empty route, which is free.
#[derive(Debug, Clone, Copy)]
pub struct ArcCost<'a> {
    model: &'a ProblemModel,
}

impl<'a> ArcCost<'a> {
    /// Wrap the problem model's matrix and stop time.
    #[must_use]
    pub const fn new(model: &'a ProblemModel) -> Self {
        Self { model }
    }

    /// `matrix[from][to] + stop_time`.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        self.model
            .travel_time(from, to)
            .saturating_add(self.model.stop_time_minutes())
    }

    /// Cost of a leg actually travelled by a route.
    #[must_use]
    pub fn leg(&self, from: usize, to: usize) -> u64 {
        if from == to { 0 } else { self.cost(from, to) }
    }

    /// Transit between two routing indices.
    #[must_use]
    pub fn transit(&self, manager: &IndexManager, from_index: usize, to_index: usize) -> u64 {
        match (manager.node_of(from_index), manager.node_of(to_index)) {
            (Some(from), Some(to)) => self.leg(from, to),
            _ => 0,
        }
    }

    /// Total cost of the closed route `depot -> nodes... -> depot`.
    #[must_use]
    pub fn route_cost(&self, depot: usize, nodes: &[usize]) -> u64 {
        closed_route(depot, nodes)
            .map(|(from, to)| self.leg(from, to))
            .fold(0_u64, u64::saturating_add)
    }
}

/// Arcs of the closed route `depot -> nodes... -> depot`.
pub fn closed_route(depot: usize, nodes: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let starts = std::iter::once(depot).chain(nodes.iter().copied());
    let ends = nodes.iter().copied().chain(std::iter::once(depot));
    starts.zip(ends)
}
