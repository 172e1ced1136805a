//! Production changes and the value weights derived from them.
//!
//! A well producing below plan carries a negative change; the shortfall is
//! what a visit addresses. Wells at or above plan are worth nothing.

use log::warn;
use rand::Rng;

/// Half-width of the range [`sample_production_deltas`] draws from.
pub const SAMPLE_DELTA_SPAN: i64 = 50;

/// Map production changes to value weights.
///
/// Each weight is `max(0, -delta)`. The depot is never worth visiting, so its
/// weight is forced to zero whatever its delta.
///
/// # Examples
///
/// ```
/// use wellroute_data::value_weights_from_production;
///
/// let weights = value_weights_from_production(&[-3, -12, 7, 0], 0);
/// assert_eq!(weights, vec![0, 12, 0, 0]);
/// ```
#[must_use]
pub fn value_weights_from_production(deltas: &[i64], depot: usize) -> Vec<u64> {
    (0..)
        .zip(deltas)
        .map(|(node, &delta)| {
            let shortfall = if delta < 0 { delta.unsigned_abs() } else { 0 };
            if node != depot {
                return shortfall;
            }
            if shortfall > 0 {
                warn!("ignoring production shortfall of {shortfall} at the depot");
            }
            0
        })
        .collect()
}

/// Draw demonstration production changes for `count` sites.
///
/// Each well's change is uniform in `[-50, 50)`; the depot's is zero. Use
/// this for tables that carry no production column.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use wellroute_data::sample_production_deltas;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let deltas = sample_production_deltas(&mut rng, 5, 0);
/// assert_eq!(deltas.len(), 5);
/// assert_eq!(deltas.first(), Some(&0));
/// ```
pub fn sample_production_deltas<R>(rng: &mut R, count: usize, depot: usize) -> Vec<i64>
where
    R: Rng + ?Sized,
{
    (0..count)
        .map(|node| {
            if node == depot {
                0
            } else {
                rng.gen_range(-SAMPLE_DELTA_SPAN..SAMPLE_DELTA_SPAN)
            }
        })
        .collect()
}
