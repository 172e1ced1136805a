//! The Time dimension: elapsed minutes accumulated along a route.

use super::ArcCost;
use super::cost::closed_route;

/// Cumulative time with zero slack, starting at zero at the depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeDimension {
    capacity: u64,
}

/// Longest feasible prefix of a candidate route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeasiblePrefix {
    /// Number of leading nodes kept.
    pub len: usize,
    /// Time to visit the kept nodes and return to the depot.
    pub total_time: u64,
}

impl TimeDimension {
    /// Name under which the dimension is reported.
    pub const NAME: &'static str = "Time";
    /// Waiting time allowed at a node.
    pub const SLACK: u64 = 0;
    /// Cumulative value at the route start.
    pub const START_CUMUL: u64 = 0;

    /// A dimension whose cumulative value may not exceed `capacity`.
    #[must_use]
    pub const fn new(capacity: u64) -> Self {
        Self { capacity }
    }

    /// Upper bound on the cumulative value.
    #[must_use]
    pub const fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Whether a cumulative value respects the bound.
    #[must_use]
    pub const fn admits(&self, cumul: u64) -> bool {
        cumul <= self.capacity
    }

    /// Cumulative time on arrival at each stop of the closed route,
    /// beginning with the start and ending with the return to the depot.
    #[must_use]
    pub fn cumuls(&self, cost: &ArcCost<'_>, depot: usize, nodes: &[usize]) -> Vec<u64> {
        let mut cumul = Self::START_CUMUL;
        let mut out = Vec::with_capacity(nodes.len().saturating_add(2));
        out.push(cumul);
        for (from, to) in closed_route(depot, nodes) {
            cumul = cumul
                .saturating_add(cost.leg(from, to))
                .saturating_add(Self::SLACK);
            out.push(cumul);
        }
        out
    }

    /// Keep leading nodes of `candidate` until the closed route first breaks
    /// the bound.
    #[must_use]
    pub fn feasible_prefix(
        &self,
        cost: &ArcCost<'_>,
        depot: usize,
        candidate: &[usize],
    ) -> FeasiblePrefix {
        let mut kept = FeasiblePrefix {
            len: 0,
            total_time: 0,
        };
        let mut open = Self::START_CUMUL;
        let mut last = depot;
        for (len, &node) in (1_usize..).zip(candidate) {
            open = open.saturating_add(cost.leg(last, node));
            let closed = open.saturating_add(cost.leg(node, depot));
            if !self.admits(closed) {
                break;
            }
            kept = FeasiblePrefix {
                len,
                total_time: closed,
            };
            last = node;
        }
        kept
    }
}
