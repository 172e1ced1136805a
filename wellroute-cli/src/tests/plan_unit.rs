//! Focused unit tests covering plan configuration, caching and reporting.

use super::helpers::{
    StubPlanServices, WELLS_CSV, WELLS_WITHOUT_PRODUCTION_CSV, Workspace, depot_only_optimizer,
    vrp_optimizer, ten_minute_matrix, write_utf8,
};
use super::*;
use crate::plan::{PlanConfig, config_from_layers_for_test, execute_plan, run_plan_with};
use camino::{Utf8Path, Utf8PathBuf};
use rstest::rstest;
use wellroute_core::cache::MemoryCacheStore;
use wellroute_core::{
    DEFAULT_MAX_TRAVEL_TIME_MINUTES, DEFAULT_STOP_TIME_MINUTES, TravelTimeError,
};
use wellroute_data::routing::test_support::StubTravelTimeProvider;
use wellroute_data::routing::{DEFAULT_BASE_URL, DEFAULT_PROFILE};

fn plan_args(sites: &Utf8Path) -> PlanArgs {
    PlanArgs {
        sites: Some(sites.to_path_buf()),
        stop_time_minutes: Some(0),
        max_travel_time_minutes: Some(600),
        search_seconds: Some(1.0),
        seed: Some(7),
        ..PlanArgs::default()
    }
}

fn plan_config(sites: &Utf8Path) -> PlanConfig {
    PlanConfig::try_from(plan_args(sites)).expect("plan config")
}

fn stub_services() -> StubPlanServices {
    StubPlanServices::new(
        StubTravelTimeProvider::with_matrix(ten_minute_matrix()),
        vrp_optimizer,
    )
}

#[rstest]
fn converting_plan_without_sites_errors() {
    match PlanConfig::try_from(PlanArgs::default()).expect_err("missing sites") {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_SITES);
            assert_eq!(env, ENV_SITES);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn plan_config_fills_defaults() {
    let args = PlanArgs {
        sites: Some(Utf8PathBuf::from("tables/north-field.csv")),
        ..PlanArgs::default()
    };

    let config = PlanConfig::try_from(args).expect("plan config");
    assert_eq!(config.route_name, "north-field");
    assert_eq!(config.output, "route.html");
    assert_eq!(config.osrm_base_url, DEFAULT_BASE_URL);
    assert_eq!(config.osrm_profile, DEFAULT_PROFILE);
    assert_eq!(config.stop_time_minutes, DEFAULT_STOP_TIME_MINUTES);
    assert_eq!(config.max_travel_time_minutes, DEFAULT_MAX_TRAVEL_TIME_MINUTES);
    assert_eq!(config.seed, 0);
    assert!(config.cache_db.is_none());
}

#[rstest]
fn explicit_route_name_overrides_file_stem() {
    let args = PlanArgs {
        sites: Some(Utf8PathBuf::from("tables/north-field.csv")),
        route_name: Some("monday".to_owned()),
        ..PlanArgs::default()
    };

    let config = PlanConfig::try_from(args).expect("plan config");
    assert_eq!(config.route_name, "monday");
}

#[rstest]
fn plan_layers_prefer_env_over_file() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "sites": "from-file.csv",
            "osrm_base_url": "http://from-file:5000",
            "stop_time_minutes": 20,
        }),
        None,
    );
    composer.push_environment(json!({ "sites": "from-env.csv", "seed": 11 }));

    let config = config_from_layers_for_test(composer.layers()).expect("merged config");
    assert_eq!(config.sites, "from-env.csv");
    assert_eq!(config.route_name, "from-env");
    assert_eq!(config.osrm_base_url, "http://from-file:5000");
    assert_eq!(config.stop_time_minutes, 20);
    assert_eq!(config.seed, 11);
}

#[rstest]
fn plan_addresses_every_shortfall_within_a_generous_budget() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, WELLS_CSV.as_bytes());
    let store = MemoryCacheStore::default();

    let outcome =
        execute_plan(&plan_config(&sites), &store, &stub_services()).expect("plan succeeds");

    assert_eq!(outcome.production_vs_plan, vec![0, -40, -10, 25]);
    assert_eq!(outcome.response.addressed_value, 50);
    assert_eq!(outcome.response.route().first(), Some(&0));
    assert_eq!(outcome.response.route().last(), Some(&0));
    assert_eq!(outcome.table.len(), 4);
}

#[rstest]
fn repeated_plans_reuse_cached_table_and_matrix() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, WELLS_CSV.as_bytes());
    let store = MemoryCacheStore::default();
    let services = stub_services();
    let config = plan_config(&sites);

    let first = execute_plan(&config, &store, &services).expect("first plan");
    std::fs::remove_file(&sites).expect("remove table");
    let second = execute_plan(&config, &store, &services).expect("second plan");

    assert_eq!(services.provider.calls(), 1);
    assert_eq!(store.len().expect("store size"), 2);
    assert_eq!(first.table, second.table);
    assert_eq!(
        first.response.addressed_value,
        second.response.addressed_value
    );
}

#[rstest]
fn tables_without_production_get_seeded_samples() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, WELLS_WITHOUT_PRODUCTION_CSV.as_bytes());
    let services = StubPlanServices::new(
        StubTravelTimeProvider::with_matrix(ten_minute_matrix()),
        depot_only_optimizer,
    );
    let config = plan_config(&sites);

    let first = execute_plan(&config, &MemoryCacheStore::default(), &services)
        .expect("first plan");
    let second = execute_plan(&config, &MemoryCacheStore::default(), &services)
        .expect("second plan");

    assert_eq!(first.production_vs_plan.len(), 4);
    assert_eq!(first.production_vs_plan.first(), Some(&0));
    assert!(
        first
            .production_vs_plan
            .iter()
            .all(|delta| (-50..50).contains(delta))
    );
    assert_eq!(first.production_vs_plan, second.production_vs_plan);
}

#[rstest]
fn provider_failures_surface_and_leave_the_matrix_uncached() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, WELLS_CSV.as_bytes());
    let store = MemoryCacheStore::default();
    let failure = TravelTimeError::ServiceError {
        code: "NoTable".to_owned(),
        message: "no route".to_owned(),
    };
    let services = StubPlanServices::new(
        StubTravelTimeProvider::with_error(failure.clone()),
        vrp_optimizer,
    );

    let err = execute_plan(&plan_config(&sites), &store, &services).expect_err("plan fails");
    match err {
        CliError::TravelTime(source) => assert_eq!(source, failure),
        other => panic!("expected TravelTime, found {other:?}"),
    }
    assert_eq!(store.len().expect("store size"), 1);
}

#[rstest]
fn malformed_tables_name_the_offending_file() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, b"well_name,latitude,longitude\n");

    let err = execute_plan(
        &plan_config(&sites),
        &MemoryCacheStore::default(),
        &stub_services(),
    )
    .expect_err("empty table");
    match err {
        CliError::LoadSites { path, .. } => assert_eq!(path, sites),
        other => panic!("expected LoadSites, found {other:?}"),
    }
}

#[rstest]
fn run_plan_writes_report_and_summary() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    let output = workspace.path("reports/wells.html");
    write_utf8(&sites, WELLS_CSV.as_bytes());
    let args = PlanArgs {
        output: Some(output.clone()),
        ..plan_args(&sites)
    };

    let mut stdout = Vec::new();
    run_plan_with(args, &stub_services(), &mut stdout).expect("plan succeeds");

    let report = std::fs::read_to_string(&output).expect("report written");
    assert!(report.contains("<table>"));
    assert!(report.contains("Well 1"));
    let summary = String::from_utf8(stdout).expect("stdout utf-8");
    assert!(summary.starts_with("visited "));
    assert!(summary.contains("addressing 50 BOE/day"));
    assert!(summary.contains(&format!("report written to {output}")));
}

#[rstest]
fn run_plan_rejects_missing_tables() {
    let workspace = Workspace::new();
    let sites = workspace.path("absent.csv");

    let mut stdout = Vec::new();
    let err = run_plan_with(plan_args(&sites), &stub_services(), &mut stdout)
        .expect_err("missing table");
    match err {
        CliError::MissingSourceFile { field, .. } => assert_eq!(field, ARG_SITES),
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[cfg(feature = "store-sqlite")]
#[rstest]
fn sqlite_cache_persists_between_runs() {
    let workspace = Workspace::new();
    let sites = workspace.path("wells.csv");
    write_utf8(&sites, WELLS_CSV.as_bytes());
    let args = PlanArgs {
        cache_db: Some(workspace.path("cache.db")),
        output: Some(workspace.path("route.html")),
        ..plan_args(&sites)
    };
    let first_services = stub_services();
    let second_services = stub_services();

    let mut stdout = Vec::new();
    run_plan_with(args.clone(), &first_services, &mut stdout).expect("first plan");
    run_plan_with(args, &second_services, &mut stdout).expect("second plan");

    assert_eq!(first_services.provider.calls(), 1);
    assert_eq!(second_services.provider.calls(), 0);
}
