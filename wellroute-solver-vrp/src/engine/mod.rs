//! Route search engine: index mapping, arc costs, the Time dimension and
//! node disjunctions assembled around a validated problem.
//!
//! Construction follows the engine's lifecycle. [`RoutingModel::build`]
//! produces a built model; [`RoutingModel::read_assignment`] loads a seed
//! route and yields a [`SeededModel`] ready for the search.

mod cost;
mod dimension;
mod disjunction;
mod index;

use log::{debug, warn};
use wellroute_core::{ProblemModel, ValidationError};

pub use cost::ArcCost;
pub(crate) use cost::closed_route;
pub use dimension::{FeasiblePrefix, TimeDimension};
pub use disjunction::{Disjunctions, NodeKind};
pub use index::IndexManager;

/// A problem with its routing components in place, not yet seeded.
#[derive(Debug, Clone)]
pub struct RoutingModel<'a> {
    model: &'a ProblemModel,
    manager: IndexManager,
    arc_cost: ArcCost<'a>,
    dimension: TimeDimension,
    disjunctions: Disjunctions,
}

impl<'a> RoutingModel<'a> {
    /// Assemble the engine for `model`.
    #[must_use]
    pub fn build(model: &'a ProblemModel, drop_penalty_factor: u64) -> Self {
        let routing = Self {
            model,
            manager: IndexManager::new(model.node_count(), model.depot()),
            arc_cost: ArcCost::new(model),
            dimension: TimeDimension::new(model.max_travel_time_minutes()),
            disjunctions: Disjunctions::new(model, drop_penalty_factor),
        };
        debug!(
            "built routing model: {} indices, {} dimension capped at {} minutes",
            routing.manager.index_count(),
            TimeDimension::NAME,
            routing.dimension.capacity()
        );
        routing
    }

    /// Validated problem behind the engine.
    #[must_use]
    pub const fn problem(&self) -> &'a ProblemModel {
        self.model
    }

    /// Node/index mapping.
    #[must_use]
    pub const fn manager(&self) -> &IndexManager {
        &self.manager
    }

    /// Arc cost used by both the objective and the dimension.
    #[must_use]
    pub const fn arc_cost(&self) -> &ArcCost<'a> {
        &self.arc_cost
    }

    /// Time dimension.
    #[must_use]
    pub const fn dimension(&self) -> &TimeDimension {
        &self.dimension
    }

    /// Node disjunctions.
    #[must_use]
    pub const fn disjunctions(&self) -> &Disjunctions {
        &self.disjunctions
    }

    /// Depot node.
    #[must_use]
    pub const fn depot(&self) -> usize {
        self.model.depot()
    }

    /// Objective of a route visiting `nodes`: its arc costs plus the penalty
    /// of every optional node it leaves out.
    #[must_use]
    pub fn objective(&self, nodes: &[usize]) -> u128 {
        let mut visited = vec![false; self.model.node_count()];
        for &node in nodes {
            if let Some(flag) = visited.get_mut(node) {
                *flag = true;
            }
        }
        let dropped = self
            .model
            .non_depot_nodes()
            .filter(|&node| !visited.get(node).copied().unwrap_or(false));
        u128::from(self.arc_cost.route_cost(self.depot(), nodes))
            .saturating_add(self.disjunctions.total_penalty(dropped))
    }

    /// A bound no route can beat: every optional node either pays its
    /// penalty or is entered through its cheapest incoming arc.
    #[must_use]
    pub fn lower_bound(&self) -> u128 {
        let node_count = self.model.node_count();
        self.model
            .non_depot_nodes()
            .map(|to| {
                let cheapest_entry = (0..node_count)
                    .filter(|&from| from != to)
                    .map(|from| self.arc_cost.cost(from, to))
                    .min()
                    .unwrap_or(u64::MAX);
                u128::from(cheapest_entry.min(self.disjunctions.penalty(to)))
            })
            .sum()
    }

    /// Load `seed` as the initial route, keeping its longest time-feasible
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSeed`] when the seed names the depot,
    /// repeats a node or refers to a node outside the problem.
    pub fn read_assignment(self, seed: &[usize]) -> Result<SeededModel<'a>, ValidationError> {
        self.model.check_seed(seed)?;
        let prefix = self
            .dimension
            .feasible_prefix(&self.arc_cost, self.depot(), seed);
        if prefix.len < seed.len() {
            warn!(
                "seed route shortened from {} to {} nodes to respect the {} minute budget",
                seed.len(),
                prefix.len,
                self.dimension.capacity()
            );
        }
        let initial_route = seed.get(..prefix.len).unwrap_or_default().to_vec();
        Ok(SeededModel {
            routing: self,
            initial_route,
        })
    }
}

/// A routing model loaded with a feasible initial route.
#[derive(Debug, Clone)]
pub struct SeededModel<'a> {
    routing: RoutingModel<'a>,
    initial_route: Vec<usize>,
}

impl<'a> SeededModel<'a> {
    /// Underlying routing model.
    #[must_use]
    pub const fn routing(&self) -> &RoutingModel<'a> {
        &self.routing
    }

    /// Non-depot nodes of the initial route, in visiting order.
    #[must_use]
    pub fn initial_route(&self) -> &[usize] {
        &self.initial_route
    }

    /// The initial route as a successor assignment.
    #[must_use]
    pub fn initial_assignment(&self) -> Assignment {
        Assignment::from_route(self.routing.manager(), &self.initial_route)
    }
}

/// Successor of every routing index.
///
/// The route runs from the start index to the end index; an index whose
/// successor is itself is not performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    next: Vec<usize>,
}

impl Assignment {
    /// Encode the route visiting `nodes` in order.
    #[must_use]
    pub fn from_route(manager: &IndexManager, nodes: &[usize]) -> Self {
        let mut next: Vec<usize> = (0..manager.index_count()).collect();
        let mut current = manager.start_index();
        for index in nodes.iter().filter_map(|&node| manager.index_of(node)) {
            if let Some(slot) = next.get_mut(current) {
                *slot = index;
            }
            current = index;
        }
        if let Some(slot) = next.get_mut(current) {
            *slot = manager.end_index();
        }
        Self { next }
    }

    #[cfg(test)]
    pub(crate) const fn from_successors(next: Vec<usize>) -> Self {
        Self { next }
    }

    /// Index visited after `index`.
    #[must_use]
    pub fn successor(&self, index: usize) -> Option<usize> {
        self.next.get(index).copied()
    }

    /// Whether `index` lies on the route.
    #[must_use]
    pub fn is_performed(&self, index: usize) -> bool {
        self.successor(index).is_some_and(|next| next != index)
    }
}
