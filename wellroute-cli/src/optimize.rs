//! `optimize` command: solve a JSON request and print the response.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use wellroute_core::{OptimizationRequest, OptimizationResponse, RouteOptimizer};
use wellroute_solver_vrp::VrpRouteOptimizer;

use crate::fs::{file_is_file, open_utf8_file};
use crate::{ARG_REQUEST, CliError, ENV_REQUEST};

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a JSON-encoded OptimizationRequest: a minute matrix, \
                 value weights and the time budget. The OptimizationResponse \
                 is printed to standard output as JSON.",
    about = "Solve an optimisation request"
)]
#[ortho_config(prefix = "WELLROUTE")]
pub(crate) struct OptimizeArgs {
    /// Path to a JSON file containing an OptimizationRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptimizeConfig {
    pub(crate) request_path: Utf8PathBuf,
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_REQUEST,
        })?;
        Ok(Self { request_path })
    }
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Builds the optimiser for an invocation.
pub(crate) trait OptimizerBuilder {
    fn build(&self) -> Box<dyn RouteOptimizer>;
}

pub(crate) struct VrpOptimizerBuilder;

impl OptimizerBuilder for VrpOptimizerBuilder {
    fn build(&self) -> Box<dyn RouteOptimizer> {
        Box::new(VrpRouteOptimizer::new())
    }
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &VrpOptimizerBuilder, &mut stdout)
}

pub(crate) fn run_optimize_with(
    args: OptimizeArgs,
    builder: &dyn OptimizerBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let response = execute_optimize(&config, builder)?;
    write_response(writer, &response)
}

fn execute_optimize(
    config: &OptimizeConfig,
    builder: &dyn OptimizerBuilder,
) -> Result<OptimizationResponse, CliError> {
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request = load_request(&config.request_path)?;
    request
        .validate()
        .map_err(|source| CliError::InvalidRequest {
            path: config.request_path.clone(),
            source,
        })?;
    let response = builder
        .build()
        .optimize(&request)
        .map_err(|source| CliError::Solve { source })?;
    info!(
        "addressed value {} in {} minutes (searched {:?}, stopped on {})",
        response.addressed_value,
        response.total_time_minutes,
        response.diagnostics.solve_time,
        response.diagnostics.stop_reason
    );
    Ok(response)
}

/// Loads a JSON-encoded [`OptimizationRequest`] from disk.
pub(crate) fn load_request(path: &Utf8Path) -> Result<OptimizationRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_response(
    writer: &mut dyn Write,
    response: &OptimizationResponse,
) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(response).map_err(CliError::SerializeResponse)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<OptimizeConfig, CliError> {
    let merged = OptimizeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    OptimizeConfig::try_from(merged)
}
