use thiserror::Error;

use crate::problem::ValidationError;
use crate::request::OptimizationRequest;
use crate::response::OptimizationResponse;

/// Errors returned by [`RouteOptimizer::optimize`].
///
/// Running out of time is not an error: the best route found so far is
/// returned. An infeasible problem is reported through
/// [`crate::SolutionStatus::Infeasible`] rather than here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Request parameters were invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),
    /// The solver produced an inconsistent result.
    #[error("internal solver failure: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

/// Find a route collecting as much value as fits in the time budget.
///
/// Implementations should return [`SolveError::InvalidRequest`] for invalid
/// parameters rather than panicking.
/// Optimizers must be `Send + Sync` to operate safely across threads.
pub trait RouteOptimizer: Send + Sync {
    /// Optimise a request, producing a route or an error.
    fn optimize(&self, request: &OptimizationRequest) -> Result<OptimizationResponse, SolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DepotOnlyOptimizer;
    use rstest::rstest;

    #[rstest]
    fn returns_response_on_valid_request() {
        let request = OptimizationRequest::new(vec![vec![0, 5], vec![5, 0]], vec![0, 100]);
        let response = DepotOnlyOptimizer
            .optimize(&request)
            .expect("valid request");
        assert_eq!(response.route(), &[0]);
        assert_eq!(response.dropped_nodes, vec![1]);
    }

    #[rstest]
    fn returns_error_on_invalid_request() {
        let request = OptimizationRequest::new(vec![vec![0, 5]], vec![0, 100]);
        let err = DepotOnlyOptimizer
            .optimize(&request)
            .expect_err("ragged matrix");
        assert!(matches!(
            err,
            SolveError::InvalidRequest(ValidationError::NotSquare { .. })
        ));
    }
}
