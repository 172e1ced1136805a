//! Behaviour-driven step definitions driving the optimize CLI scenarios.

use super::helpers::{Workspace, write_utf8};
use super::*;
use crate::optimize::{VrpOptimizerBuilder, run_optimize_with};
use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use wellroute_core::{OptimizationRequest, OptimizationResponse, SearchSettings, ValidationError};

struct OptimizeWorld {
    _workspace: Workspace,
    request_path: Utf8PathBuf,
    include_request: RefCell<bool>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl OptimizeWorld {
    fn new() -> Self {
        let workspace = Workspace::new();
        let request_path = workspace.path("request.json");
        Self {
            _workspace: workspace,
            request_path,
            include_request: RefCell::new(true),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn build_command_line(&self) -> Vec<String> {
        let mut argv = vec!["wellroute".to_owned(), "optimize".to_owned()];
        if *self.include_request.borrow() {
            argv.push(self.request_path.as_str().to_owned());
        }
        argv
    }

    fn write_request(&self, request: &OptimizationRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialize request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    fn error(&self) -> std::cell::Ref<'_, CliError> {
        std::cell::Ref::map(self.result.borrow(), |result| {
            result
                .as_ref()
                .expect("result recorded")
                .as_ref()
                .expect_err("expected error")
        })
    }
}

#[fixture]
fn world() -> OptimizeWorld {
    OptimizeWorld::new()
}

fn three_well_request() -> OptimizationRequest {
    OptimizationRequest::new(
        vec![vec![0, 10, 20], vec![10, 0, 10], vec![20, 10, 0]],
        vec![0, 40, 15],
    )
    .with_stop_time_minutes(5)
    .with_max_travel_time_minutes(120)
    .with_search(SearchSettings {
        time_limit_seconds: 1.0,
        seed: 3,
        ..SearchSettings::default()
    })
}

#[given("a valid optimisation request exists on disk")]
fn valid_request_exists(#[from(world)] world: &OptimizeWorld) {
    world.write_request(&three_well_request());
}

#[given("the optimisation request contains invalid JSON")]
fn request_contains_invalid_json(#[from(world)] world: &OptimizeWorld) {
    write_utf8(&world.request_path, b"{ not valid json");
}

#[given("the optimisation request asks for two vehicles")]
fn request_asks_for_two_vehicles(#[from(world)] world: &OptimizeWorld) {
    let mut request = three_well_request();
    request.vehicle_count = 2;
    world.write_request(&request);
}

#[given("I omit the request path")]
fn omit_request_path(#[from(world)] world: &OptimizeWorld) {
    *world.include_request.borrow_mut() = false;
}

#[when("I run the optimize command")]
fn run_optimize_command(#[from(world)] world: &OptimizeWorld) {
    let invocation = world.build_command_line();
    let parsed = Cli::try_parse_from(invocation).map_err(CliError::from);
    let outcome = parsed.and_then(|cli| match cli.command {
        Command::Optimize(args) => {
            let mut buffer = world.stdout.borrow_mut();
            run_optimize_with(args, &VrpOptimizerBuilder, &mut *buffer)
        }
        Command::Plan(_) => panic!("expected optimize command"),
    });

    world.result.replace(Some(outcome));
}

#[then("the command succeeds and prints the response as JSON")]
fn command_succeeds_and_prints_json(#[from(world)] world: &OptimizeWorld) {
    let borrowed = world.result.borrow();
    let result = borrowed.as_ref().expect("result recorded");
    result.as_ref().expect("expected success");

    let stdout = String::from_utf8(world.stdout.borrow().clone()).expect("stdout utf-8");
    let response: OptimizationResponse =
        serde_json::from_str(&stdout).expect("output should be a JSON response");
    assert_eq!(response.addressed_value, 55);
    assert_eq!(response.route().first(), Some(&0));
    assert_eq!(response.route().last(), Some(&0));
}

#[then("the command fails because the request JSON is invalid")]
fn command_fails_invalid_json(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::ParseRequest { .. } => {}
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[then("the command fails because the request is invalid")]
fn command_fails_invalid_request(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::InvalidRequest { source, .. } => {
            assert_eq!(
                *source,
                ValidationError::UnsupportedVehicleCount { count: 2 }
            );
        }
        other => panic!("expected InvalidRequest, found {other:?}"),
    }
}

#[then("the command fails because the request path is missing")]
fn command_fails_missing_request_path(#[from(world)] world: &OptimizeWorld) {
    match &*world.error() {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, ARG_REQUEST),
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

macro_rules! register_optimize_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/optimize_command.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: OptimizeWorld) {
            let _ = world;
        }
    };
}

register_optimize_scenario!(optimize_happy_path, "solving a request from JSON");
register_optimize_scenario!(optimize_invalid_json, "rejecting invalid JSON input");
register_optimize_scenario!(
    optimize_invalid_request,
    "rejecting requests that fail validation"
);
register_optimize_scenario!(optimize_missing_request, "rejecting missing request paths");
