//! Request builders for solver tests.

use wellroute_core::{OptimizationRequest, SearchSettings};

/// Search settings that stop on stagnation long before the clock runs out.
#[must_use]
pub fn quick_search() -> SearchSettings {
    SearchSettings {
        time_limit_seconds: 60.0,
        max_iterations: 2_000,
        stagnation_limit: 200,
        ..SearchSettings::default()
    }
}

/// Depot plus one well worth 100, five minutes away, no dwell time.
#[must_use]
pub fn two_node_request(max_travel_time_minutes: u64) -> OptimizationRequest {
    OptimizationRequest::new(vec![vec![0, 5], vec![5, 0]], vec![0, 100])
        .with_stop_time_minutes(0)
        .with_max_travel_time_minutes(max_travel_time_minutes)
        .with_search(quick_search())
}
