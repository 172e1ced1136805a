//! Compute travel times between sites.
//!
//! The [`TravelTimeProvider`] trait abstracts the retrieval of pairwise travel
//! times between [`Site`](crate::Site) values. Callers supply a slice of sites
//! and receive a square matrix of whole minutes.
//!
//! Errors are returned when inputs are invalid, e.g. an empty slice, or when
//! the backing routing service fails.

mod error;
mod provider;

pub use error::TravelTimeError;
pub use provider::{TimeMatrix, TravelTimeProvider, UNREACHABLE_MINUTES};
