//! Data access for the Wellroute optimiser.
//!
//! Responsibilities:
//! - Load the depot and well table from CSV.
//! - Turn production changes into value weights.
//! - Fetch travel-time matrices from an OSRM routing service.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `wellroute-core` and the solver).
//! - Keep blocking I/O off async executors; the HTTP provider owns its runtime.
//!
//! Invariants:
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod production;
pub mod routing;
mod sites;

pub use production::{sample_production_deltas, value_weights_from_production};
pub use sites::{DEPOT_ROW, SiteTable, SiteTableError, load_sites_csv};
