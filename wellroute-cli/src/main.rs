//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "WELLROUTE_LOG";

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on standard error"
)]
fn main() {
    init_logging();
    if let Err(err) = wellroute_cli::run() {
        eprintln!("wellroute: {err}");
        std::process::exit(1);
    }
}

/// Route `log` records to standard error, filtered by `WELLROUTE_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        log::debug!("a global logger was already installed");
    }
}
