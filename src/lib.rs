//! Facade crate for the Wellroute well visit planner.
//!
//! This crate re-exports the core domain types and exposes the optimiser and
//! cache stores behind feature flags.

#![forbid(unsafe_code)]

pub use wellroute_core::{
    Diagnostics, NaiveRoute, OptimizationRequest, OptimizationResponse, ProblemModel,
    RouteLimits, RouteOptimizer, SearchSettings, Site, SolutionStatus, SolveError, StopReason,
    TimeMatrix, TravelTimeError, TravelTimeProvider, ValidationError, Visit,
};

#[cfg(feature = "serde")]
pub use wellroute_core::cache::{CacheError, CacheStore, MemoryCacheStore, read_through};

#[cfg(feature = "store-sqlite")]
pub use wellroute_core::SqliteCacheStore;

#[cfg(feature = "solver-vrp")]
pub use wellroute_solver_vrp::VrpRouteOptimizer;
