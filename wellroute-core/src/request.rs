//! Optimisation requests as received from callers.

use std::time::Duration;

use crate::problem::{
    DEFAULT_MAX_TRAVEL_TIME_MINUTES, DEFAULT_STOP_TIME_MINUTES, ProblemModel, RouteLimits,
    ValidationError,
};
use crate::travel_time::TimeMatrix;

/// Multiplier turning a value weight into a drop penalty.
pub const DEFAULT_DROP_PENALTY_FACTOR: u64 = 100;

/// Default wall-clock search budget in seconds.
pub const DEFAULT_TIME_LIMIT_SECONDS: f64 = 30.0;

/// Default cap on search generations: unbounded.
pub const DEFAULT_MAX_ITERATIONS: u64 = u64::MAX;

/// Default stagnation window: unbounded.
pub const DEFAULT_STAGNATION_LIMIT: u64 = u64::MAX;

/// Tuning knobs for the local search.
///
/// Every field has a default, so an empty JSON object is a valid value. By
/// default only the time limit and a route matching the objective's lower
/// bound stop the search; the generation cap and the stagnation window are
/// opt-in, mainly for reproducible runs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchSettings {
    /// Wall-clock budget for the search.
    pub time_limit_seconds: f64,
    /// Maximum number of search generations; `u64::MAX` means no cap.
    pub max_iterations: u64,
    /// Generations without any change in the best objective before the
    /// search stops; `u64::MAX` disables the check.
    pub stagnation_limit: u64,
    /// Seed for the search's random generator.
    pub seed: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
            seed: 0,
        }
    }
}

impl SearchSettings {
    /// The time limit as a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeLimit`] unless the limit is a
    /// positive, finite number of seconds.
    pub fn time_limit(&self) -> Result<Duration, ValidationError> {
        Duration::try_from_secs_f64(self.time_limit_seconds)
            .ok()
            .filter(|limit| !limit.is_zero())
            .ok_or(ValidationError::InvalidTimeLimit {
                seconds: self.time_limit_seconds,
            })
    }
}

/// Input to [`crate::RouteOptimizer::optimize`].
///
/// # Examples
///
/// ```
/// use wellroute_core::OptimizationRequest;
///
/// let request = OptimizationRequest::new(vec![vec![0, 5], vec![5, 0]], vec![0, 100])
///     .with_stop_time_minutes(0)
///     .with_max_travel_time_minutes(100);
/// let model = request.validate().expect("valid request");
/// assert_eq!(model.max_travel_time_minutes(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationRequest {
    /// Pairwise travel times in minutes.
    pub time_matrix_minutes: TimeMatrix,
    /// Value collected by visiting each node.
    pub value_weights: Vec<u64>,
    /// Start and end node.
    #[cfg_attr(feature = "serde", serde(default))]
    pub depot_index: usize,
    /// Number of vehicles; must be 1.
    #[cfg_attr(feature = "serde", serde(default = "default_vehicle_count"))]
    pub vehicle_count: usize,
    /// Dwell time added to every arc travelled.
    #[cfg_attr(feature = "serde", serde(default = "default_stop_time_minutes"))]
    pub stop_time_minutes: u64,
    /// Time budget for the whole route.
    #[cfg_attr(feature = "serde", serde(default = "default_max_travel_time_minutes"))]
    pub max_travel_time_minutes: u64,
    /// Visit order used to seed the search; derived from the value weights
    /// when absent.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_route: Option<Vec<usize>>,
    /// Local search tuning.
    #[cfg_attr(feature = "serde", serde(default))]
    pub search: SearchSettings,
    /// Multiplier turning a value weight into a drop penalty.
    #[cfg_attr(feature = "serde", serde(default = "default_drop_penalty_factor"))]
    pub drop_penalty_factor: u64,
}

#[cfg(feature = "serde")]
const fn default_vehicle_count() -> usize {
    1
}

#[cfg(feature = "serde")]
const fn default_stop_time_minutes() -> u64 {
    DEFAULT_STOP_TIME_MINUTES
}

#[cfg(feature = "serde")]
const fn default_max_travel_time_minutes() -> u64 {
    DEFAULT_MAX_TRAVEL_TIME_MINUTES
}

#[cfg(feature = "serde")]
const fn default_drop_penalty_factor() -> u64 {
    DEFAULT_DROP_PENALTY_FACTOR
}

impl OptimizationRequest {
    /// Create a request with default limits and search settings.
    #[must_use]
    pub fn new(time_matrix_minutes: TimeMatrix, value_weights: Vec<u64>) -> Self {
        let limits = RouteLimits::default();
        Self {
            time_matrix_minutes,
            value_weights,
            depot_index: limits.depot_index,
            vehicle_count: limits.vehicle_count,
            stop_time_minutes: limits.stop_time_minutes,
            max_travel_time_minutes: limits.max_travel_time_minutes,
            initial_route: None,
            search: SearchSettings::default(),
            drop_penalty_factor: DEFAULT_DROP_PENALTY_FACTOR,
        }
    }

    /// Set the depot index.
    #[must_use]
    pub const fn with_depot_index(mut self, depot_index: usize) -> Self {
        self.depot_index = depot_index;
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

    /// Seed the search with an explicit visit order.
    #[must_use]
    pub fn with_initial_route(mut self, route: Vec<usize>) -> Self {
        self.initial_route = Some(route);
        self
    }

    /// Replace the search settings.
    #[must_use]
    pub fn with_search(mut self, search: SearchSettings) -> Self {
        self.search = search;
        self
    }

    /// Set the drop penalty multiplier.
    #[must_use]
    pub const fn with_drop_penalty_factor(mut self, factor: u64) -> Self {
        self.drop_penalty_factor = factor;
        self
    }

    /// The route limits carried by this request.
    #[must_use]
    pub const fn limits(&self) -> RouteLimits {
        RouteLimits {
            depot_index: self.depot_index,
            vehicle_count: self.vehicle_count,
            stop_time_minutes: self.stop_time_minutes,
            max_travel_time_minutes: self.max_travel_time_minutes,
        }
    }

    /// Validate the request and build its [`ProblemModel`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found in the problem data, the
    /// initial route or the search time limit.
    pub fn validate(&self) -> Result<ProblemModel, ValidationError> {
        let model = ProblemModel::new(
            self.time_matrix_minutes.clone(),
            self.value_weights.clone(),
            self.limits(),
        )?;
        if let Some(route) = &self.initial_route {
            model.check_seed(route)?;
        }
        self.search.time_limit()?;
        Ok(model)
    }
}
