//! Test doubles shared by unit and behaviour tests.

use std::time::Duration;

use geo::Coord;

use crate::{
    Diagnostics, NaiveRoute, OptimizationRequest, OptimizationResponse, RouteOptimizer, Site,
    SolutionStatus, SolveError, StopReason, TimeMatrix, TravelTimeError, TravelTimeProvider,
    Visit,
};
#[cfg(feature = "serde")]
use crate::cache::{CacheError, CacheStore};

/// Deterministic `TravelTimeProvider` returning one-minute edges.
#[derive(Default, Debug, Copy, Clone)]
pub struct UnitTravelTimeProvider;

impl TravelTimeProvider for UnitTravelTimeProvider {
    fn get_travel_time_matrix(&self, sites: &[Site]) -> Result<TimeMatrix, TravelTimeError> {
        if sites.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let n = sites.len();
        Ok((0..n)
            .map(|i| (0..n).map(|j| u64::from(i != j)).collect())
            .collect())
    }
}

/// Build `count` sites named `Site {id}` along a line of longitude.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "test helper spaces sites with a simple latitude offset"
)]
pub fn sample_sites(count: usize) -> Vec<Site> {
    (0_u32..)
        .take(count)
        .map(|id| {
            Site::new(
                u64::from(id),
                format!("Site {id}"),
                Coord {
                    x: -108.0,
                    y: 36.0 + f64::from(id) / 100.0,
                },
            )
        })
        .collect()
}

/// `RouteOptimizer` that validates the request and stays at the depot.
#[derive(Default, Debug, Copy, Clone)]
pub struct DepotOnlyOptimizer;

impl RouteOptimizer for DepotOnlyOptimizer {
    fn optimize(&self, request: &OptimizationRequest) -> Result<OptimizationResponse, SolveError> {
        let model = request.validate()?;
        let depot = model.depot();
        let dropped_nodes: Vec<usize> = model.non_depot_nodes().collect();
        let objective = dropped_nodes
            .iter()
            .map(|&node| {
                model
                    .value_weight(node)
                    .saturating_mul(request.drop_penalty_factor)
            })
            .sum();
        Ok(OptimizationResponse {
            routes: vec![vec![depot]],
            addressed_value: 0,
            total_time_minutes: 0,
            status: SolutionStatus::Solved,
            objective,
            dropped_nodes,
            visits: vec![Visit {
                node: depot,
                cumulative_time_minutes: 0,
                cumulative_value: 0,
            }],
            naive: NaiveRoute {
                route: vec![depot],
                addressed_value: 0,
                total_time_minutes: 0,
            },
            diagnostics: Diagnostics {
                solve_time: Duration::ZERO,
                stop_reason: StopReason::LowerBound,
            },
        })
    }
}

/// `CacheStore` whose reads or writes always fail.
#[cfg(feature = "serde")]
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingCacheStore {
    fail_reads: bool,
    fail_writes: bool,
}

#[cfg(feature = "serde")]
impl FailingCacheStore {
    /// Reads succeed with a miss; writes fail.
    #[must_use]
    pub const fn failing_writes() -> Self {
        Self {
            fail_reads: false,
            fail_writes: true,
        }
    }

    /// Reads fail.
    #[must_use]
    pub const fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            fail_writes: false,
        }
    }
}

#[cfg(feature = "serde")]
impl CacheStore for FailingCacheStore {
    fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        if self.fail_reads {
            Err(CacheError::Poisoned)
        } else {
            Ok(None)
        }
    }

    fn put(&self, _key: &str, _value: &str) -> Result<(), CacheError> {
        if self.fail_writes {
            Err(CacheError::Poisoned)
        } else {
            Ok(())
        }
    }
}
