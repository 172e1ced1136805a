//! `plan` command: well table in, HTML route report out.
//!
//! The site table and the travel-time matrix are both read through the
//! cache, so a repeated plan for the same wells neither re-reads the table
//! nor queries the routing service again.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wellroute_core::cache::{
    CacheStore, MemoryCacheStore, matrix_cache_key, read_through, site_table_cache_key,
};
use wellroute_core::{
    DEFAULT_MAX_TRAVEL_TIME_MINUTES, DEFAULT_STOP_TIME_MINUTES, DEFAULT_TIME_LIMIT_SECONDS,
    OptimizationRequest, OptimizationResponse, RouteOptimizer, SearchSettings, Site, TimeMatrix,
    TravelTimeProvider,
};
use wellroute_data::routing::{
    DEFAULT_BASE_URL, DEFAULT_PROFILE, HttpTravelTimeProvider, HttpTravelTimeProviderConfig,
};
use wellroute_data::{
    DEPOT_ROW, SiteTable, load_sites_csv, sample_production_deltas, value_weights_from_production,
};
use wellroute_solver_vrp::VrpRouteOptimizer;

use crate::fs::{open_utf8_file, write_utf8_file};
use crate::optimize::require_existing;
use crate::report::{improvement_percent, render_report};
use crate::{
    ARG_CACHE_DB, ARG_MAX_TRAVEL_TIME_MINUTES, ARG_OSRM_BASE_URL, ARG_OSRM_PROFILE, ARG_OUTPUT,
    ARG_ROUTE_NAME, ARG_SEARCH_SECONDS, ARG_SEED, ARG_SITES, ARG_STOP_TIME_MINUTES, CliError,
    ENV_SITES,
};

const DEFAULT_OUTPUT: &str = "route.html";
const DEFAULT_ROUTE_NAME: &str = "default";

/// CLI arguments for the `plan` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Load a CSV table of wells (depot first), weight each well by \
                 its production shortfall, fetch drive times from OSRM, and \
                 write an HTML report of the optimised route. Tables without a \
                 production_vs_plan column get sampled demonstration values.",
    about = "Plan a route from a well table"
)]
#[ortho_config(prefix = "WELLROUTE")]
pub(crate) struct PlanArgs {
    /// CSV table with well_name, latitude and longitude columns.
    #[arg(long = ARG_SITES, value_name = "path")]
    #[serde(default)]
    pub(crate) sites: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// OSRM routing profile.
    #[arg(long = ARG_OSRM_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) osrm_profile: Option<String>,
    /// SQLite database caching site tables and matrices between runs.
    #[arg(long = ARG_CACHE_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) cache_db: Option<Utf8PathBuf>,
    /// Cache name for the site table; defaults to the table's file stem.
    #[arg(long = ARG_ROUTE_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) route_name: Option<String>,
    /// Where to write the HTML report.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Minutes spent at each well.
    #[arg(long = ARG_STOP_TIME_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) stop_time_minutes: Option<u64>,
    /// Time budget for the whole route.
    #[arg(long = ARG_MAX_TRAVEL_TIME_MINUTES, value_name = "minutes")]
    #[serde(default)]
    pub(crate) max_travel_time_minutes: Option<u64>,
    /// Wall-clock budget for the search.
    #[arg(long = ARG_SEARCH_SECONDS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) search_seconds: Option<f64>,
    /// Seed for the search and for sampled production.
    #[arg(long = ARG_SEED, value_name = "n")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl PlanArgs {
    pub(crate) fn into_config(self) -> Result<PlanConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PlanConfig::try_from(merged)
    }
}

/// Resolved `plan` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PlanConfig {
    pub(crate) sites: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) osrm_profile: String,
    pub(crate) cache_db: Option<Utf8PathBuf>,
    pub(crate) route_name: String,
    pub(crate) output: Utf8PathBuf,
    pub(crate) stop_time_minutes: u64,
    pub(crate) max_travel_time_minutes: u64,
    pub(crate) search_seconds: f64,
    pub(crate) seed: u64,
}

impl TryFrom<PlanArgs> for PlanConfig {
    type Error = CliError;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        let sites = args.sites.ok_or(CliError::MissingArgument {
            field: ARG_SITES,
            env: ENV_SITES,
        })?;
        let route_name = args
            .route_name
            .or_else(|| sites.file_stem().map(str::to_owned))
            .unwrap_or_else(|| DEFAULT_ROUTE_NAME.to_owned());

        Ok(Self {
            route_name,
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            osrm_profile: args
                .osrm_profile
                .unwrap_or_else(|| DEFAULT_PROFILE.to_owned()),
            cache_db: args.cache_db,
            output: args
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT)),
            stop_time_minutes: args.stop_time_minutes.unwrap_or(DEFAULT_STOP_TIME_MINUTES),
            max_travel_time_minutes: args
                .max_travel_time_minutes
                .unwrap_or(DEFAULT_MAX_TRAVEL_TIME_MINUTES),
            search_seconds: args.search_seconds.unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),
            seed: args.seed.unwrap_or_default(),
            sites,
        })
    }
}

impl PlanConfig {
    fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            time_limit_seconds: self.search_seconds,
            seed: self.seed,
            ..SearchSettings::default()
        }
    }
}

/// External services a plan depends on.
pub(crate) trait PlanServices {
    /// Fetch the minute matrix between `sites`; only called on a cache miss.
    fn travel_times(&self, config: &PlanConfig, sites: &[Site]) -> Result<TimeMatrix, CliError>;

    fn optimizer(&self) -> Box<dyn RouteOptimizer>;
}

pub(crate) struct DefaultPlanServices;

impl PlanServices for DefaultPlanServices {
    fn travel_times(&self, config: &PlanConfig, sites: &[Site]) -> Result<TimeMatrix, CliError> {
        let provider_config = HttpTravelTimeProviderConfig::new(config.osrm_base_url.clone())
            .with_profile(config.osrm_profile.clone());
        let provider = HttpTravelTimeProvider::with_config(provider_config).map_err(|source| {
            CliError::BuildTravelTimeProvider {
                base_url: config.osrm_base_url.clone(),
                source,
            }
        })?;
        provider
            .get_travel_time_matrix(sites)
            .map_err(CliError::TravelTime)
    }

    fn optimizer(&self) -> Box<dyn RouteOptimizer> {
        Box::new(VrpRouteOptimizer::new())
    }
}

/// Everything a report needs from one plan.
#[derive(Debug, Clone)]
pub(crate) struct PlanOutcome {
    pub(crate) table: SiteTable,
    pub(crate) production_vs_plan: Vec<i64>,
    pub(crate) response: OptimizationResponse,
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_plan_with(args, &DefaultPlanServices, &mut stdout)
}

pub(crate) fn run_plan_with(
    args: PlanArgs,
    services: &dyn PlanServices,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    require_existing(&config.sites, ARG_SITES)?;
    let store = open_cache(config.cache_db.as_deref())?;
    let outcome = execute_plan(&config, store.as_ref(), services)?;

    let html = render_report(
        &outcome.table.sites,
        &outcome.production_vs_plan,
        &outcome.response,
    );
    write_utf8_file(&config.output, html.as_bytes()).map_err(|source| {
        CliError::WriteReport {
            path: config.output.clone(),
            source,
        }
    })?;
    write_summary(writer, &outcome, &config.output)
}

pub(crate) fn execute_plan(
    config: &PlanConfig,
    store: &dyn CacheStore,
    services: &dyn PlanServices,
) -> Result<PlanOutcome, CliError> {
    let table: SiteTable = read_through(store, &site_table_cache_key(&config.route_name), || {
        load_sites(&config.sites)
    })?;
    let production_vs_plan = table.production_vs_plan.clone().unwrap_or_else(|| {
        info!(
            "{} has no production column; sampling with seed {}",
            config.sites, config.seed
        );
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        sample_production_deltas(&mut rng, table.len(), DEPOT_ROW)
    });
    let weights = value_weights_from_production(&production_vs_plan, DEPOT_ROW);

    let matrix: TimeMatrix = read_through(store, &matrix_cache_key(&table.sites), || {
        services.travel_times(config, &table.sites)
    })?;

    let request = OptimizationRequest::new(matrix, weights)
        .with_depot_index(DEPOT_ROW)
        .with_stop_time_minutes(config.stop_time_minutes)
        .with_max_travel_time_minutes(config.max_travel_time_minutes)
        .with_search(config.search_settings());
    let response = services
        .optimizer()
        .optimize(&request)
        .map_err(|source| CliError::Solve { source })?;
    info!(
        "{}: visiting {} of {} wells in {} minutes",
        config.route_name,
        response.visited_nodes().len(),
        table.len().saturating_sub(1),
        response.total_time_minutes
    );

    Ok(PlanOutcome {
        table,
        production_vs_plan,
        response,
    })
}

fn load_sites(path: &Utf8Path) -> Result<SiteTable, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    load_sites_csv(file).map_err(|source| CliError::LoadSites {
        path: path.to_path_buf(),
        source,
    })
}

fn open_cache(cache_db: Option<&Utf8Path>) -> Result<Box<dyn CacheStore>, CliError> {
    match cache_db {
        None => Ok(Box::new(MemoryCacheStore::default())),
        Some(path) => open_sqlite_cache(path),
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite_cache(path: &Utf8Path) -> Result<Box<dyn CacheStore>, CliError> {
    let store = wellroute_core::SqliteCacheStore::open(path.as_std_path())
        .map_err(CliError::OpenCache)?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite_cache(_path: &Utf8Path) -> Result<Box<dyn CacheStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "--cache-db",
    })
}

fn write_summary(
    writer: &mut dyn Write,
    outcome: &PlanOutcome,
    output: &Utf8Path,
) -> Result<(), CliError> {
    let response = &outcome.response;
    let improvement = improvement_percent(response.addressed_value, response.naive.addressed_value)
        .map_or_else(
            || "no naive baseline".to_owned(),
            |percent| format!("{percent}% over the naive route"),
        );
    writeln!(
        writer,
        "visited {} wells addressing {} BOE/day in {} minutes ({improvement}); solved in {} ms",
        response.visited_nodes().len(),
        response.addressed_value,
        response.total_time_minutes,
        response.diagnostics.solve_time.as_millis(),
    )
    .and_then(|()| writeln!(writer, "report written to {output}"))
    .map_err(CliError::WriteOutput)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<PlanConfig, CliError> {
    let merged = PlanArgs::merge_from_layers(layers).map_err(CliError::from)?;
    PlanConfig::try_from(merged)
}
