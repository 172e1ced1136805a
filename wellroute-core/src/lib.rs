//! Core domain types for the Wellroute optimiser.
//!
//! These models validate their input up front so that the search engine can
//! rely on well-formed data. Constructors return `Result` to surface invalid
//! input early; once a [`ProblemModel`] exists, every node index and minute
//! value it holds is in range.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "serde")]
pub mod cache;
mod optimizer;
pub mod problem;
mod request;
mod response;
mod site;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod travel_time;

pub use optimizer::{RouteOptimizer, SolveError};
pub use problem::{
    DEFAULT_MAX_TRAVEL_TIME_MINUTES, DEFAULT_STOP_TIME_MINUTES, MAX_MINUTES, ProblemModel,
    RouteLimits, SeedIssue, ValidationError,
};
pub use request::{
    DEFAULT_DROP_PENALTY_FACTOR, DEFAULT_MAX_ITERATIONS, DEFAULT_STAGNATION_LIMIT,
    DEFAULT_TIME_LIMIT_SECONDS, OptimizationRequest, SearchSettings,
};
pub use response::{
    Diagnostics, NaiveRoute, OptimizationResponse, SolutionStatus, StopReason, Visit,
};
pub use site::Site;
pub use travel_time::{TimeMatrix, TravelTimeError, TravelTimeProvider, UNREACHABLE_MINUTES};

#[cfg(feature = "store-sqlite")]
pub use cache::SqliteCacheStore;
