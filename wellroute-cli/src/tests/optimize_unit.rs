//! Focused unit tests covering optimize CLI configuration and request loading.

use super::helpers::{Workspace, write_utf8};
use super::*;
use crate::optimize::{
    OptimizeConfig, OptimizerBuilder, config_from_layers_for_test, load_request,
    require_existing, run_optimize_with,
};
use rstest::rstest;
use wellroute_core::test_support::DepotOnlyOptimizer;
use wellroute_core::{OptimizationResponse, RouteOptimizer, ValidationError};

struct DepotOnlyBuilder;

impl OptimizerBuilder for DepotOnlyBuilder {
    fn build(&self) -> Box<dyn RouteOptimizer> {
        Box::new(DepotOnlyOptimizer)
    }
}

#[rstest]
fn converting_optimize_without_request_errors() {
    let err = OptimizeConfig::try_from(OptimizeArgs::default())
        .expect_err("missing request should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(env, ENV_REQUEST);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn require_existing_distinguishes_missing_paths_from_directories() {
    let workspace = Workspace::new();
    let missing = workspace.path("absent.json");
    let directory = workspace.path("request.json");
    std::fs::create_dir(&directory).expect("request directory");

    match require_existing(&missing, ARG_REQUEST).expect_err("missing path") {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, missing);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    match require_existing(&directory, ARG_REQUEST).expect_err("directory") {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_REQUEST),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn load_request_applies_serde_defaults() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(
        &path,
        br#"{"time_matrix_minutes": [[0, 5], [5, 0]], "value_weights": [0, 30]}"#,
    );

    let request = load_request(&path).expect("request should load");
    assert_eq!(request.depot_index, 0);
    assert_eq!(request.vehicle_count, 1);
    assert_eq!(request.value_weights, vec![0, 30]);
    assert!(request.initial_route.is_none());
}

#[rstest]
fn load_request_reports_invalid_json() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(&path, b"{ not json");

    match load_request(&path).expect_err("invalid JSON") {
        CliError::ParseRequest { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected ParseRequest, found {other:?}"),
    }
}

#[rstest]
fn run_optimize_rejects_mismatched_weights() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(
        &path,
        br#"{"time_matrix_minutes": [[0, 5], [5, 0]], "value_weights": [0, 30, 7]}"#,
    );
    let args = OptimizeArgs {
        request_path: Some(path),
    };

    let mut stdout = Vec::new();
    let err = run_optimize_with(args, &DepotOnlyBuilder, &mut stdout)
        .expect_err("mismatched weights should fail validation");
    match err {
        CliError::InvalidRequest { source, .. } => assert_eq!(
            source,
            ValidationError::LengthMismatch {
                matrix: 2,
                weights: 3
            }
        ),
        other => panic!("expected InvalidRequest, found {other:?}"),
    }
    assert!(stdout.is_empty());
}

#[rstest]
fn run_optimize_prints_the_response_as_json() {
    let workspace = Workspace::new();
    let path = workspace.path("request.json");
    write_utf8(
        &path,
        br#"{"time_matrix_minutes": [[0, 5], [5, 0]], "value_weights": [0, 30]}"#,
    );
    let args = OptimizeArgs {
        request_path: Some(path),
    };

    let mut stdout = Vec::new();
    run_optimize_with(args, &DepotOnlyBuilder, &mut stdout).expect("optimize should succeed");

    let text = String::from_utf8(stdout).expect("stdout utf-8");
    assert!(text.ends_with('\n'));
    let response: OptimizationResponse = serde_json::from_str(&text).expect("response JSON");
    assert_eq!(response.route(), &[0]);
    assert_eq!(response.dropped_nodes, vec![1]);
}

#[rstest]
fn invalid_layer_maps_to_configuration_error() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "request_path": 42 }));

    match config_from_layers_for_test(composer.layers()).expect_err("invalid layer") {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
#[case::env_over_file(false, "from-env.json")]
#[case::cli_over_env(true, "from-cli.json")]
fn merge_layers_honour_precedence(#[case] with_cli: bool, #[case] expected: &str) {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(json!({ "request_path": "from-file.json" }), None);
    composer.push_environment(json!({ "request_path": "from-env.json" }));
    if with_cli {
        composer.push_cli(json!({ "request_path": "from-cli.json" }));
    }

    let config = config_from_layers_for_test(composer.layers()).expect("merged config");
    assert_eq!(config.request_path, expected);
}
