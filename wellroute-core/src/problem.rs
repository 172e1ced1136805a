//! The validated optimisation problem.
//!
//! A [`ProblemModel`] bundles the pairwise travel-time matrix, the per-node
//! value weights and the route limits (depot, stop duration and time budget).
//! Construction is the single validation gate: once a model exists, every
//! index in `0..node_count()` is addressable and every minute value fits in
//! [`MAX_MINUTES`], so downstream arithmetic cannot overflow a `u64`.

use std::fmt;

use log::warn;
use thiserror::Error;

use crate::travel_time::TimeMatrix;

/// Largest accepted minute value (`u32::MAX`) for matrix entries, stop time
/// and the time budget.
pub const MAX_MINUTES: u64 = 4_294_967_295;

/// Stop duration used when none is supplied.
pub const DEFAULT_STOP_TIME_MINUTES: u64 = 30;

/// Twelve-hour shift used when no time budget is supplied.
pub const DEFAULT_MAX_TRAVEL_TIME_MINUTES: u64 = 12 * 60;

/// Depot, fleet size, stop duration and time budget for a problem.
///
/// # Examples
///
/// ```
/// use wellroute_core::RouteLimits;
///
/// let limits = RouteLimits::default().with_max_travel_time_minutes(90);
/// assert_eq!(limits.depot_index, 0);
/// assert_eq!(limits.max_travel_time_minutes, 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLimits {
    /// Node where the route starts and ends.
    pub depot_index: usize,
    /// Number of vehicles. Only a single vehicle is supported.
    pub vehicle_count: usize,
    /// Dwell time added to every arc travelled.
    pub stop_time_minutes: u64,
    /// Upper bound on the cumulative route time.
    pub max_travel_time_minutes: u64,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            depot_index: 0,
            vehicle_count: 1,
            stop_time_minutes: DEFAULT_STOP_TIME_MINUTES,
            max_travel_time_minutes: DEFAULT_MAX_TRAVEL_TIME_MINUTES,
        }
    }
}

impl RouteLimits {
    /// Set the depot index.
    #[must_use]
    pub const fn with_depot_index(mut self, depot_index: usize) -> Self {
        self.depot_index = depot_index;
        self
    }

    /// Set the number of vehicles.
    #[must_use]
    pub const fn with_vehicle_count(mut self, vehicle_count: usize) -> Self {
        self.vehicle_count = vehicle_count;
        self
    }

    /// Set the per-stop dwell time.
    #[must_use]
    pub const fn with_stop_time_minutes(mut self, minutes: u64) -> Self {
        self.stop_time_minutes = minutes;
        self
    }

    /// Set the time budget.
    #[must_use]
    pub const fn with_max_travel_time_minutes(mut self, minutes: u64) -> Self {
        self.max_travel_time_minutes = minutes;
        self
    }
}

/// Reason an initial route entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedIssue {
    /// The node index is not part of the problem.
    OutOfRange,
    /// The depot may not appear inside the route.
    Depot,
    /// The node already appeared earlier in the route.
    Duplicate,
}

impl fmt::Display for SeedIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::OutOfRange => "node index is out of range",
            Self::Depot => "the depot cannot be scheduled as a stop",
            Self::Duplicate => "node appears more than once",
        };
        f.write_str(text)
    }
}

/// Errors raised while validating problem input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// More than one vehicle (or none) was requested.
    #[error("exactly one vehicle is supported, got {count}")]
    UnsupportedVehicleCount {
        /// Requested number of vehicles.
        count: usize,
    },
    /// A matrix row has a different length from the number of rows.
    #[error("time matrix row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Number of rows in the matrix.
        expected: usize,
        /// Number of entries in the offending row.
        found: usize,
    },
    /// The matrix dimension and the weight list disagree.
    #[error("time matrix covers {matrix} nodes but {weights} value weights were supplied")]
    LengthMismatch {
        /// Matrix dimension.
        matrix: usize,
        /// Length of the weight list.
        weights: usize,
    },
    /// The depot index does not name a node.
    #[error("depot index {depot} is out of range for {node_count} nodes")]
    DepotOutOfRange {
        /// Requested depot.
        depot: usize,
        /// Number of nodes in the problem.
        node_count: usize,
    },
    /// A minute value exceeds [`MAX_MINUTES`].
    #[error("{field} value {value} exceeds the supported maximum of u32::MAX minutes")]
    MinutesOutOfRange {
        /// Which input carried the value.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },
    /// The initial route names an unusable node.
    #[error("initial route entry {node} is invalid: {issue}")]
    InvalidSeed {
        /// The rejected node index.
        node: usize,
        /// Why it was rejected.
        issue: SeedIssue,
    },
    /// The search time limit is not a positive, finite duration.
    #[error("search time limit must be a positive, finite number of seconds, got {seconds}")]
    InvalidTimeLimit {
        /// The rejected number of seconds.
        seconds: f64,
    },
}

/// Validated travel times, value weights and route limits.
///
/// # Examples
///
/// ```
/// use wellroute_core::{ProblemModel, RouteLimits};
///
/// # fn main() -> Result<(), wellroute_core::ValidationError> {
/// let model = ProblemModel::new(
///     vec![vec![0, 5], vec![5, 0]],
///     vec![0, 100],
///     RouteLimits::default().with_stop_time_minutes(0),
/// )?;
/// assert_eq!(model.node_count(), 2);
/// assert_eq!(model.travel_time(0, 1), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemModel {
    time_matrix: TimeMatrix,
    value_weights: Vec<u64>,
    depot: usize,
    stop_time_minutes: u64,
    max_travel_time_minutes: u64,
}

impl ProblemModel {
    /// Validate and construct a problem.
    ///
    /// A non-zero weight on the depot is ignored and logged.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the matrix is not square, when its
    /// dimension differs from the weight count, when the depot is out of
    /// range, when more or fewer than one vehicle is requested, or when a
    /// minute value exceeds [`MAX_MINUTES`].
    pub fn new(
        time_matrix: TimeMatrix,
        mut value_weights: Vec<u64>,
        limits: RouteLimits,
    ) -> Result<Self, ValidationError> {
        if limits.vehicle_count != 1 {
            return Err(ValidationError::UnsupportedVehicleCount {
                count: limits.vehicle_count,
            });
        }

        let node_count = time_matrix.len();
        if let Some((row, entries)) = time_matrix
            .iter()
            .enumerate()
            .find(|(_, entries)| entries.len() != node_count)
        {
            return Err(ValidationError::NotSquare {
                row,
                expected: node_count,
                found: entries.len(),
            });
        }
        if value_weights.len() != node_count {
            return Err(ValidationError::LengthMismatch {
                matrix: node_count,
                weights: value_weights.len(),
            });
        }
        if limits.depot_index >= node_count {
            return Err(ValidationError::DepotOutOfRange {
                depot: limits.depot_index,
                node_count,
            });
        }

        if let Some(&value) = time_matrix
            .iter()
            .flatten()
            .find(|&&minutes| minutes > MAX_MINUTES)
        {
            return Err(ValidationError::MinutesOutOfRange {
                field: "time_matrix_minutes",
                value,
            });
        }
        check_minutes("stop_time_minutes", limits.stop_time_minutes)?;
        check_minutes("max_travel_time_minutes", limits.max_travel_time_minutes)?;

        if let Some(weight) = value_weights.get_mut(limits.depot_index)
            && *weight != 0
        {
            warn!(
                "ignoring value weight {} on depot node {}",
                *weight, limits.depot_index
            );
            *weight = 0;
        }

        Ok(Self {
            time_matrix,
            value_weights,
            depot: limits.depot_index,
            stop_time_minutes: limits.stop_time_minutes,
            max_travel_time_minutes: limits.max_travel_time_minutes,
        })
    }

    /// Number of nodes, depot included.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.time_matrix.len()
    }

    /// Index of the depot.
    #[must_use]
    pub const fn depot(&self) -> usize {
        self.depot
    }

    /// Dwell time charged on every arc travelled.
    #[must_use]
    pub const fn stop_time_minutes(&self) -> u64 {
        self.stop_time_minutes
    }

    /// Upper bound on the cumulative route time.
    #[must_use]
    pub const fn max_travel_time_minutes(&self) -> u64 {
        self.max_travel_time_minutes
    }

    /// Travel time from `from` to `to` in minutes.
    ///
    /// Indices outside the problem report [`MAX_MINUTES`].
    #[must_use]
    pub fn travel_time(&self, from: usize, to: usize) -> u64 {
        let minutes = self
            .time_matrix
            .get(from)
            .and_then(|row| row.get(to))
            .copied();
        debug_assert!(minutes.is_some(), "arc {from}->{to} outside the problem");
        minutes.unwrap_or(MAX_MINUTES)
    }

    /// Value weight of `node`; zero for the depot and for unknown nodes.
    #[must_use]
    pub fn value_weight(&self, node: usize) -> u64 {
        self.value_weights.get(node).copied().unwrap_or(0)
    }

    /// All value weights, indexed by node.
    #[must_use]
    pub fn value_weights(&self) -> &[u64] {
        &self.value_weights
    }

    /// The travel-time matrix.
    #[must_use]
    pub const fn time_matrix(&self) -> &TimeMatrix {
        &self.time_matrix
    }

    /// Every node except the depot, in ascending order.
    pub fn non_depot_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.node_count()).filter(move |&node| node != self.depot)
    }

    /// Check a caller-supplied visit order against this problem.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSeed`] for an out-of-range node, the
    /// depot, or a repeated node.
    pub fn check_seed(&self, seed: &[usize]) -> Result<(), ValidationError> {
        let mut seen = vec![false; self.node_count()];
        for &node in seed {
            let issue = if node == self.depot {
                Some(SeedIssue::Depot)
            } else {
                match seen.get_mut(node) {
                    None => Some(SeedIssue::OutOfRange),
                    Some(true) => Some(SeedIssue::Duplicate),
                    Some(flag) => {
                        *flag = true;
                        None
                    }
                }
            };
            if let Some(issue) = issue {
                return Err(ValidationError::InvalidSeed { node, issue });
            }
        }
        Ok(())
    }
}

const fn check_minutes(field: &'static str, value: u64) -> Result<(), ValidationError> {
    if value > MAX_MINUTES {
        Err(ValidationError::MinutesOutOfRange { field, value })
    } else {
        Ok(())
    }
}
