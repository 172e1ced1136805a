use thiserror::Error;

/// Errors from [`crate::travel_time::TravelTimeProvider::get_travel_time_matrix`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelTimeError {
    /// No sites were provided.
    ///
    /// The provider requires at least one site to compute a matrix. Callers
    /// should pre-filter input to avoid this condition.
    #[error("at least one site is required")]
    EmptyInput,
    /// The routing service did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The routing service answered with a non-success HTTP status.
    #[error("request to {url} failed with HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error detail.
        message: String,
    },
    /// The request never reached the routing service.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Error detail.
        message: String,
    },
    /// The routing service reported a failure in its response body.
    #[error("routing service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `InvalidQuery`.
        code: String,
        /// Service message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse routing response: {message}")]
    ParseError {
        /// Decoder detail.
        message: String,
    },
    /// The returned matrix does not match the number of sites.
    #[error("routing service returned a {found}-row matrix for {expected} sites")]
    DimensionMismatch {
        /// Number of sites requested.
        expected: usize,
        /// Number of rows (or columns of the offending row) returned.
        found: usize,
    },
}
