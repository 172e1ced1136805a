//! Test helpers for writing CLI inputs and stubbing external services.

use super::*;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;
use wellroute_core::{RouteOptimizer, Site, TimeMatrix, TravelTimeProvider};
use wellroute_data::routing::test_support::StubTravelTimeProvider;

use crate::plan::{PlanConfig, PlanServices};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }
}

/// Depot plus three wells with production changes.
pub(super) const WELLS_CSV: &str = "\
well_name,latitude,longitude,production_vs_plan
Yard,36.70,-108.20,
Well 1,36.71,-108.21,-40
Well 2,36.72,-108.22,-10
Well 3,36.73,-108.23,25
";

/// The same wells without a production column.
pub(super) const WELLS_WITHOUT_PRODUCTION_CSV: &str = "\
well_name,latitude,longitude
Yard,36.70,-108.20
Well 1,36.71,-108.21
Well 2,36.72,-108.22
Well 3,36.73,-108.23
";

/// Ten-minute legs between four sites.
pub(super) fn ten_minute_matrix() -> TimeMatrix {
    (0..4_usize)
        .map(|i| (0..4_usize).map(|j| if i == j { 0 } else { 10 }).collect())
        .collect()
}

/// Plan services backed by a stub provider and a caller-chosen optimiser.
pub(super) struct StubPlanServices {
    pub(super) provider: StubTravelTimeProvider,
    optimizer: fn() -> Box<dyn RouteOptimizer>,
}

impl StubPlanServices {
    pub(super) fn new(
        provider: StubTravelTimeProvider,
        optimizer: fn() -> Box<dyn RouteOptimizer>,
    ) -> Self {
        Self {
            provider,
            optimizer,
        }
    }
}

impl PlanServices for StubPlanServices {
    fn travel_times(&self, _config: &PlanConfig, sites: &[Site]) -> Result<TimeMatrix, CliError> {
        self.provider
            .get_travel_time_matrix(sites)
            .map_err(CliError::TravelTime)
    }

    fn optimizer(&self) -> Box<dyn RouteOptimizer> {
        (self.optimizer)()
    }
}

pub(super) fn vrp_optimizer() -> Box<dyn RouteOptimizer> {
    Box::new(wellroute_solver_vrp::VrpRouteOptimizer::new())
}

pub(super) fn depot_only_optimizer() -> Box<dyn RouteOptimizer> {
    Box::new(wellroute_core::test_support::DepotOnlyOptimizer)
}
