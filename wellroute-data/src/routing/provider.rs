//! `TravelTimeProvider` backed by OSRM's Table API.
//!
//! Durations arrive in seconds and are floored to whole minutes. Pairs OSRM
//! cannot connect, and durations that are negative or not finite, become
//! [`UNREACHABLE_MINUTES`].

use std::future::Future;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use wellroute_core::{
    Site, TimeMatrix, TravelTimeError, TravelTimeProvider, UNREACHABLE_MINUTES,
};

use super::osrm::TableResponse;

/// Default OSRM endpoint.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default OSRM routing profile; service trucks drive between wells.
pub const DEFAULT_PROFILE: &str = "driving";

/// Default user agent for OSRM requests.
pub const DEFAULT_USER_AGENT: &str = "wellroute-routing/0.1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const SECONDS_PER_MINUTE: u64 = 60;

/// Reasons an [`HttpTravelTimeProvider`] cannot be constructed.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The `reqwest` client rejected its settings.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The private Tokio runtime could not start.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Where and how [`HttpTravelTimeProvider`] reaches OSRM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTravelTimeProviderConfig {
    /// Service root, e.g. `"http://localhost:5000"`; a trailing slash is
    /// ignored.
    pub base_url: String,
    /// Profile segment of the request path.
    pub profile: String,
    /// Connect and overall request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpTravelTimeProviderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl HttpTravelTimeProviderConfig {
    /// Settings for the service at `base_url` with the default profile,
    /// timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Route with `profile`, e.g. `"driving"` or `"walking"`.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Give up on requests after `timeout`.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Identify as `user_agent`.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Table API URL for `sites`: `{base_url}/table/v1/{profile}/{lon,lat;...}`.
    fn table_url(&self, sites: &[Site]) -> String {
        let coordinates: Vec<String> = sites
            .iter()
            .map(|site| format!("{},{}", site.location.x, site.location.y))
            .collect();
        format!(
            "{}/table/v1/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.profile,
            coordinates.join(";")
        )
    }
}

/// Minute matrices from an OSRM server.
///
/// Each provider owns a `current_thread` Tokio runtime that it blocks on for
/// every request. When called from inside a multi-threaded runtime it
/// borrows that runtime through [`tokio::task::block_in_place`] instead.
/// Calls from inside a `current_thread` runtime still use the private
/// runtime and can deadlock if the caller's runtime owns IO the request
/// needs.
#[derive(Debug)]
pub struct HttpTravelTimeProvider {
    client: Client,
    config: HttpTravelTimeProviderConfig,
    runtime: Runtime,
}

impl HttpTravelTimeProvider {
    /// A provider for the service at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// See [`HttpTravelTimeProvider::with_config`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpTravelTimeProviderConfig::new(base_url))
    }

    /// A provider using `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the HTTP client or the Tokio
    /// runtime cannot be built.
    pub fn with_config(config: HttpTravelTimeProviderConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration this provider was built with.
    #[must_use]
    pub const fn config(&self) -> &HttpTravelTimeProviderConfig {
        &self.config
    }

    async fn fetch_table(&self, url: &str) -> Result<TableResponse, TravelTimeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| self.request_failure(&err, url))?;
        response
            .json::<TableResponse>()
            .await
            .map_err(|err| TravelTimeError::ParseError {
                message: err.to_string(),
            })
    }

    fn request_failure(&self, error: &reqwest::Error, url: &str) -> TravelTimeError {
        let url = url.to_owned();
        let message = error.to_string();
        match error.status() {
            _ if error.is_timeout() => TravelTimeError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            },
            Some(status) => TravelTimeError::HttpError {
                url,
                status: status.as_u16(),
                message,
            },
            None => TravelTimeError::NetworkError { url, message },
        }
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

impl TravelTimeProvider for HttpTravelTimeProvider {
    fn get_travel_time_matrix(&self, sites: &[Site]) -> Result<TimeMatrix, TravelTimeError> {
        if sites.is_empty() {
            return Err(TravelTimeError::EmptyInput);
        }
        let url = self.config.table_url(sites);
        debug!("requesting {0}x{0} travel-time table from {url}", sites.len());
        let table = self.block_on(self.fetch_table(&url))?;
        minute_matrix(table, sites.len())
    }
}

/// The minute matrix in an OSRM answer for `expected` sites.
fn minute_matrix(table: TableResponse, expected: usize) -> Result<TimeMatrix, TravelTimeError> {
    if !table.is_ok() {
        return Err(TravelTimeError::ServiceError {
            code: table.code,
            message: table.message.unwrap_or_default(),
        });
    }
    let rows = table.durations.ok_or_else(|| TravelTimeError::ParseError {
        message: "OSRM response missing durations array".to_owned(),
    })?;

    let found = std::iter::once(rows.len())
        .chain(rows.iter().map(Vec::len))
        .find(|&len| len != expected);
    if let Some(found) = found {
        return Err(TravelTimeError::DimensionMismatch { expected, found });
    }

    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(whole_minutes).collect())
        .collect())
}

/// Floor a duration in seconds to minutes; unusable values are unreachable.
fn whole_minutes(seconds: Option<f64>) -> u64 {
    seconds
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .map_or(UNREACHABLE_MINUTES, |duration| {
            duration
                .as_secs()
                .div_euclid(SECONDS_PER_MINUTE)
                .min(UNREACHABLE_MINUTES)
        })
}
