//! Metaheuristic route optimiser for Wellroute, built on `vrp-core`.
//!
//! [`VrpRouteOptimizer`] implements [`wellroute_core::RouteOptimizer`] in
//! five steps:
//!
//! 1. validate the request into a [`wellroute_core::ProblemModel`];
//! 2. build a warm-start seed ([`build_warm_start`]) unless the request
//!    supplies one, and record what it achieves alone ([`evaluate_seed`]);
//! 3. assemble the routing model ([`engine::RoutingModel`]) and load the
//!    seed, shrinking it to its longest feasible prefix;
//! 4. run [`vrp::VrpSearch`] until its deadline or the lower bound stops it
//!    (or an opt-in generation cap or stagnation window);
//! 5. read the route, running totals and dropped wells out of the result
//!    ([`interpret::interpret`]), falling back to the seed prefix if the
//!    search collected less value than the seed.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod engine;
pub mod interpret;
mod solver;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
pub mod vrp;
mod warm_start;

pub use solver::VrpRouteOptimizer;
pub use warm_start::{build_warm_start, evaluate_seed};
