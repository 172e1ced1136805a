//! Travel-time provider trait and minute-matrix alias for site pairs.

use crate::Site;
use crate::problem::MAX_MINUTES;

use super::error::TravelTimeError;

/// Square matrix of travel times in whole minutes.
pub type TimeMatrix = Vec<Vec<u64>>;

/// Marker for pairs a routing service could not connect.
///
/// Equal to [`MAX_MINUTES`], so an unreachable arc is accepted by
/// validation but never fits inside a realistic time budget.
pub const UNREACHABLE_MINUTES: u64 = MAX_MINUTES;

/// Fetch pairwise travel times for a set of sites.
///
/// Implementers must return a square `n×n` matrix where `n == sites.len()`.
/// `matrix[i][j]` is the travel time from `sites[i]` to `sites[j]`.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use wellroute_core::{Site, TimeMatrix, TravelTimeError, TravelTimeProvider};
///
/// struct FlatProvider;
///
/// impl TravelTimeProvider for FlatProvider {
///     fn get_travel_time_matrix(&self, sites: &[Site]) -> Result<TimeMatrix, TravelTimeError> {
///         if sites.is_empty() {
///             return Err(TravelTimeError::EmptyInput);
///         }
///         let n = sites.len();
///         Ok((0..n)
///             .map(|i| (0..n).map(|j| u64::from(i != j) * 10).collect())
///             .collect())
///     }
/// }
///
/// let depot = Site::new(0, "home", Coord { x: -108.2, y: 36.7 });
/// let matrix = FlatProvider.get_travel_time_matrix(&[depot])?;
/// assert_eq!(matrix, vec![vec![0]]);
/// # Ok::<(), TravelTimeError>(())
/// ```
pub trait TravelTimeProvider {
    /// Return a matrix of travel times for `sites`.
    ///
    /// Implementations must return `Err(TravelTimeError::EmptyInput)` when
    /// `sites` is empty.
    fn get_travel_time_matrix(&self, sites: &[Site]) -> Result<TimeMatrix, TravelTimeError>;
}
