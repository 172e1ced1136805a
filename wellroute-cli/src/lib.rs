//! Command-line interface for the Wellroute optimiser.
//!
//! `wellroute optimize` solves a JSON-encoded request and prints the
//! response. `wellroute plan` builds the request from a well table and a
//! routing service, solves it and writes an HTML report.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod optimize;
mod plan;
mod report;

pub use error::CliError;
pub use report::render_report;

use optimize::OptimizeArgs;
use plan::PlanArgs;

pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ENV_REQUEST: &str = "WELLROUTE_CMDS_OPTIMIZE_REQUEST_PATH";
pub(crate) const ARG_SITES: &str = "sites";
pub(crate) const ENV_SITES: &str = "WELLROUTE_CMDS_PLAN_SITES";
pub(crate) const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
pub(crate) const ARG_OSRM_PROFILE: &str = "osrm-profile";
pub(crate) const ARG_CACHE_DB: &str = "cache-db";
pub(crate) const ARG_ROUTE_NAME: &str = "route-name";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_STOP_TIME_MINUTES: &str = "stop-time-minutes";
pub(crate) const ARG_MAX_TRAVEL_TIME_MINUTES: &str = "max-travel-time-minutes";
pub(crate) const ARG_SEARCH_SECONDS: &str = "search-seconds";
pub(crate) const ARG_SEED: &str = "seed";

/// Run the Wellroute CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first step that failed.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => optimize::run_optimize(args),
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "wellroute",
    about = "Plan a service route that addresses the largest production shortfalls",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve a JSON optimisation request and print the response.
    Optimize(OptimizeArgs),
    /// Build a route from a well table and write an HTML report.
    Plan(PlanArgs),
}

#[cfg(test)]
mod tests;
