//! Behavioural tests for `VrpRouteOptimizer` using rstest-bdd.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use wellroute_core::{
    OptimizationRequest, OptimizationResponse, RouteOptimizer, SearchSettings, SolveError,
    ValidationError,
};
use wellroute_solver_vrp::VrpRouteOptimizer;

#[derive(Debug)]
struct OptimizerWorld {
    request: RefCell<OptimizationRequest>,
    outcome: RefCell<Option<Result<OptimizationResponse, SolveError>>>,
}

impl OptimizerWorld {
    fn new() -> Self {
        Self {
            request: RefCell::new(OptimizationRequest::new(vec![vec![0]], vec![0])),
            outcome: RefCell::new(None),
        }
    }

    fn update(&self, change: impl FnOnce(OptimizationRequest) -> OptimizationRequest) {
        let request = self.request.borrow().clone();
        self.request.replace(change(request));
    }

    #[expect(
        clippy::expect_used,
        reason = "behaviour tests use expect for readable failures"
    )]
    fn response(&self) -> OptimizationResponse {
        self.outcome
            .borrow()
            .clone()
            .expect("outcome should be recorded before assertions")
            .expect("expected the optimiser to succeed")
    }
}

#[fixture]
fn world() -> OptimizerWorld {
    OptimizerWorld::new()
}

#[given("a depot and one well five minutes away worth 100")]
fn given_two_nodes(world: &OptimizerWorld) {
    let search = SearchSettings {
        time_limit_seconds: 60.0,
        stagnation_limit: 100,
        ..SearchSettings::default()
    };
    world.request.replace(
        OptimizationRequest::new(vec![vec![0, 5], vec![5, 0]], vec![0, 100])
            .with_stop_time_minutes(0)
            .with_search(search),
    );
}

#[given("a depot and one well 100 minutes away worth 1")]
fn given_distant_low_value_well(world: &OptimizerWorld) {
    given_two_nodes(world);
    world.update(|request| OptimizationRequest {
        time_matrix_minutes: vec![vec![0, 100], vec![100, 0]],
        value_weights: vec![0, 1],
        ..request
    });
}

#[given("a time budget of {minutes} minutes")]
fn given_budget(world: &OptimizerWorld, minutes: u64) {
    world.update(|request| request.with_max_travel_time_minutes(minutes));
}

#[given("a seed route that names the depot")]
fn given_depot_seed(world: &OptimizerWorld) {
    world.update(|request| request.with_initial_route(vec![0, 1]));
}

#[given("a seed route that visits the well")]
fn given_well_seed(world: &OptimizerWorld) {
    world.update(|request| request.with_initial_route(vec![1]));
}

#[when("the optimiser runs")]
fn when_optimiser_runs(world: &OptimizerWorld) {
    let request = world.request.borrow().clone();
    world
        .outcome
        .replace(Some(VrpRouteOptimizer::new().optimize(&request)));
}

#[then("the route is the depot alone")]
fn then_depot_only(world: &OptimizerWorld) {
    let response = world.response();
    assert_eq!(response.route(), &[0]);
    assert_eq!(response.dropped_nodes, vec![1]);
}

#[then("the route visits the well and returns")]
fn then_round_trip(world: &OptimizerWorld) {
    assert_eq!(world.response().route(), &[0, 1, 0]);
}

#[then("the addressed value is {value}")]
fn then_value(world: &OptimizerWorld, value: u64) {
    assert_eq!(world.response().addressed_value, value);
}

#[then("the total time is {minutes} minutes")]
fn then_total_time(world: &OptimizerWorld, minutes: u64) {
    assert_eq!(world.response().total_time_minutes, minutes);
}

#[then("the request is rejected as an invalid seed")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_invalid_seed(world: &OptimizerWorld) {
    let err = world
        .outcome
        .borrow()
        .clone()
        .expect("outcome recorded")
        .expect_err("expected a validation failure");
    assert!(matches!(
        err,
        SolveError::InvalidRequest(ValidationError::InvalidSeed { .. })
    ));
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 0)]
fn zero_budget(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 1)]
fn generous_budget(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 2)]
fn budget_below_round_trip(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 3)]
fn depot_in_seed(world: OptimizerWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_optimizer.feature", index = 4)]
fn seed_outvalues_cheapest_objective(world: OptimizerWorld) {
    let _ = world;
}
