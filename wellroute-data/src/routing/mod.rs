//! Travel-time matrices from an OSRM routing service.
//!
//! [`HttpTravelTimeProvider`] implements
//! [`wellroute_core::TravelTimeProvider`] on top of the OSRM Table API. The
//! trait is synchronous, so the provider blocks on its HTTP calls internally
//! and stays usable from plain synchronous code.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use wellroute_core::{Site, TravelTimeProvider};
//! use wellroute_data::routing::{HttpTravelTimeProvider, HttpTravelTimeProviderConfig};
//!
//! let config = HttpTravelTimeProviderConfig::new("http://localhost:5000")
//!     .with_profile("driving")
//!     .with_timeout(Duration::from_secs(60));
//! let provider = HttpTravelTimeProvider::with_config(config)?;
//!
//! let sites = vec![
//!     Site::new(0, "Yard", Coord { x: -108.20, y: 36.70 }),
//!     Site::new(1, "Well 1", Coord { x: -108.21, y: 36.71 }),
//! ];
//! let matrix = provider.get_travel_time_matrix(&sites)?;
//! assert_eq!(matrix.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, DEFAULT_USER_AGENT, HttpTravelTimeProvider,
    HttpTravelTimeProviderConfig, ProviderBuildError,
};
