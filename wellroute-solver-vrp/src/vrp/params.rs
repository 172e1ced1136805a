//! Stopping rules for the route search.

use std::time::Duration;

use wellroute_core::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_STAGNATION_LIMIT, SearchSettings, ValidationError,
};

/// Validated search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    /// Wall-clock budget for the search.
    pub time_limit: Duration,
    /// Generation cap; `u64::MAX` leaves it off.
    pub max_iterations: u64,
    /// Generations over which an unchanged best objective ends the search;
    /// `u64::MAX` leaves it off.
    pub stagnation_limit: u64,
    /// Seed for the search's random generator.
    pub seed: u64,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            stagnation_limit: DEFAULT_STAGNATION_LIMIT,
            seed: 0,
        }
    }
}

impl SearchParameters {
    /// Replace the time limit.
    #[must_use]
    pub const fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Replace the generation cap.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replace the stagnation window.
    #[must_use]
    pub const fn with_stagnation_limit(mut self, stagnation_limit: u64) -> Self {
        self.stagnation_limit = stagnation_limit;
        self
    }

    /// Replace the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Time limit in whole seconds, rounded up.
    pub(crate) fn time_limit_seconds(&self) -> usize {
        let whole = self
            .time_limit
            .as_secs()
            .saturating_add(u64::from(self.time_limit.subsec_nanos() > 0));
        usize::try_from(whole.max(1)).unwrap_or(usize::MAX)
    }

    /// Generation cap, if one is set.
    pub(crate) fn generation_cap(&self) -> Option<usize> {
        bounded(self.max_iterations)
    }

    /// Stagnation window, if one is set.
    pub(crate) fn stagnation_window(&self) -> Option<usize> {
        bounded(self.stagnation_limit)
    }
}

fn bounded(limit: u64) -> Option<usize> {
    (limit != u64::MAX).then(|| usize::try_from(limit).unwrap_or(usize::MAX))
}

impl TryFrom<&SearchSettings> for SearchParameters {
    type Error = ValidationError;

    fn try_from(settings: &SearchSettings) -> Result<Self, Self::Error> {
        Ok(Self {
            time_limit: settings.time_limit()?,
            max_iterations: settings.max_iterations,
            stagnation_limit: settings.stagnation_limit,
            seed: settings.seed,
        })
    }
}
