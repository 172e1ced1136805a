//! Benchmark support utilities for the route optimiser.
//!
//! Generates deterministic well fields: a depot at the centre and wells
//! scattered around it, with travel times proportional to distance.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use wellroute_core::{OptimizationRequest, SearchSettings, TimeMatrix};

/// Seed for deterministic random number generation in benchmarks.
pub const BENCHMARK_SEED: u64 = 42;

/// Side of the square field, in minutes of driving.
const FIELD_MINUTES: i64 = 120;

/// Build a request over `well_count` wells plus a depot at node 0.
///
/// Travel time is the Manhattan distance between grid positions, so the
/// matrix obeys the triangle inequality. Value weights lie in `0..=50`.
#[must_use]
pub fn generate_well_field(well_count: usize, seed: u64) -> OptimizationRequest {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let half = FIELD_MINUTES.saturating_div(2);
    let positions: Vec<(i64, i64)> = std::iter::once((half, half))
        .chain((0..well_count).map(|_| {
            (
                rng.gen_range(0..=FIELD_MINUTES),
                rng.gen_range(0..=FIELD_MINUTES),
            )
        }))
        .collect();
    let matrix: TimeMatrix = positions
        .iter()
        .map(|&(x1, y1)| {
            positions
                .iter()
                .map(|&(x2, y2)| (x1.abs_diff(x2)).saturating_add(y1.abs_diff(y2)))
                .collect()
        })
        .collect();
    let weights = std::iter::once(0)
        .chain((0..well_count).map(|_| rng.gen_range(0..=50)))
        .collect();
    OptimizationRequest::new(matrix, weights)
        .with_stop_time_minutes(30)
        .with_max_travel_time_minutes(12 * 60)
        .with_search(SearchSettings {
            time_limit_seconds: 10.0,
            max_iterations: 2_000,
            stagnation_limit: 200,
            seed,
        })
}
