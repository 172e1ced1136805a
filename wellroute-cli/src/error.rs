//! The CLI's error type.
//!
//! Large payloads are shared through `Arc` so `CliError` stays under the
//! workspace's `result_large_err` threshold.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wellroute_core::cache::{CacheError, ReadThroughError};
use wellroute_core::{SolveError, TravelTimeError, ValidationError};
use wellroute_data::SiteTableError;
use wellroute_data::routing::ProviderBuildError;

/// Everything a `wellroute` command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command line did not parse.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Merging configuration files, environment and flags failed.
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// No layer supplied a required option.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without dashes.
        field: &'static str,
        /// Environment variable that also supplies it.
        env: &'static str,
    },
    /// The binary was built without a feature the invocation needs.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// What the user asked for.
        action: &'static str,
    },
    /// An input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// An input path names a directory or other non-file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Checking an input path failed for another reason.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening an input file failed.
    #[error("failed to open {path:?}: {source}")]
    OpenInput {
        /// Input path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse optimisation request JSON at {path:?}: {source}")]
    ParseRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The request payload failed validation.
    #[error("optimisation request in {path:?} failed validation: {source}")]
    InvalidRequest {
        /// Request path.
        path: Utf8PathBuf,
        /// Validation failure.
        #[source]
        source: ValidationError,
    },
    /// The well table could not be loaded.
    #[error("failed to load well table {path:?}: {source}")]
    LoadSites {
        /// Table path.
        path: Utf8PathBuf,
        /// Loader failure.
        #[source]
        source: SiteTableError,
    },
    /// Opening the cache database failed.
    #[error("failed to open cache: {0}")]
    OpenCache(#[source] CacheError),
    /// Reading a cache entry failed.
    #[error("failed to read cache entry {key:?}: {source}")]
    ReadCache {
        /// Cache key.
        key: String,
        /// Backend failure.
        #[source]
        source: CacheError,
    },
    /// A cache entry holds a payload that no longer decodes.
    #[error("cache entry {key:?} is corrupt: {source}")]
    DecodeCache {
        /// Cache key.
        key: String,
        /// Decoder failure.
        #[source]
        source: serde_json::Error,
    },
    /// The OSRM client could not be built.
    #[error("failed to build travel time provider for {base_url:?}: {source}")]
    BuildTravelTimeProvider {
        /// Configured routing service URL.
        base_url: String,
        /// Construction failure.
        #[source]
        source: ProviderBuildError,
    },
    /// Fetching the travel-time matrix failed.
    #[error("failed to fetch travel times: {0}")]
    TravelTime(#[source] TravelTimeError),
    /// The optimiser rejected the request.
    #[error("optimiser failed: {source}")]
    Solve {
        /// Optimiser failure.
        source: SolveError,
    },
    /// Serializing the optimisation response failed.
    #[error("failed to serialize optimisation response: {0}")]
    SerializeResponse(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
    /// Writing the HTML report failed.
    #[error("failed to write report to {path:?}: {source}")]
    WriteReport {
        /// Report path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
}

impl From<ReadThroughError<Self>> for CliError {
    fn from(err: ReadThroughError<Self>) -> Self {
        match err {
            ReadThroughError::Read { key, source } => Self::ReadCache { key, source },
            ReadThroughError::Decode { key, source } => Self::DecodeCache { key, source },
            ReadThroughError::Compute(inner) => inner,
        }
    }
}
