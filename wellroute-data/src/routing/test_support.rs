//! Test utilities for routing providers.
//!
//! [`StubTravelTimeProvider`] returns pre-configured responses without
//! contacting a routing service, and counts how often it was asked.

use std::cell::Cell;

use wellroute_core::{Site, TimeMatrix, TravelTimeError, TravelTimeProvider};

/// Stub `TravelTimeProvider` for testing.
///
/// # Example
///
/// ```
/// use geo::Coord;
/// use wellroute_core::{Site, TravelTimeProvider};
/// use wellroute_data::routing::test_support::StubTravelTimeProvider;
///
/// let provider = StubTravelTimeProvider::with_matrix(vec![vec![0, 12], vec![12, 0]]);
/// let sites = vec![
///     Site::new(0, "Yard", Coord { x: 0.0, y: 0.0 }),
///     Site::new(1, "Well 1", Coord { x: 1.0, y: 1.0 }),
/// ];
///
/// assert_eq!(provider.get_travel_time_matrix(&sites)?[0][1], 12);
/// assert_eq!(provider.calls(), 1);
/// # Ok::<(), wellroute_core::TravelTimeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct StubTravelTimeProvider {
    response: StubResponse,
    calls: Cell<usize>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Matrix(TimeMatrix),
    Error(TravelTimeError),
}

impl StubTravelTimeProvider {
    /// Create a provider that returns `matrix` for any non-empty input.
    #[must_use]
    pub const fn with_matrix(matrix: TimeMatrix) -> Self {
        Self {
            response: StubResponse::Matrix(matrix),
            calls: Cell::new(0),
        }
    }

    /// Create a provider that fails with `error` for any non-empty input.
    #[must_use]
    pub const fn with_error(error: TravelTimeError) -> Self {
        Self {
            response: StubResponse::Error(error),
            calls: Cell::new(0),
        }
    }

    /// Create a provider returning one-minute legs between `size` sites.
    #[must_use]
    pub fn with_unit_matrix(size: usize) -> Self {
        Self::with_matrix(
            (0..size)
                .map(|i| (0..size).map(|j| u64::from(i != j)).collect())
                .collect(),
        )
    }

    /// Number of matrix requests answered so far, failures included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TravelTimeProvider for StubTravelTimeProvider {
    fn get_travel_time_matrix(&self, sites: &[Site]) -> Result<TimeMatrix, TravelTimeError> {
        if sites.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        self.calls.set(self.calls.get().saturating_add(1));

        match &self.response {
            StubResponse::Matrix(matrix) => Ok(matrix.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}
