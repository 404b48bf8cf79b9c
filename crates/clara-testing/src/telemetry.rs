//! Log output for the acceptance runner.
//!
//! Logs go to stderr so the verdicts on stdout stay machine readable.
//! Compact output drops timestamps; JSON output keeps them for collection.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use clara_config::{Config, LogFormat, default_runner_log_format};

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The filter expression did not parse.
    #[error("invalid log filter '{filter}': {message}")]
    Filter {
        /// The rejected expression.
        filter: String,
        /// Parser diagnostic.
        message: String,
    },
    /// The subscriber could not be installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(String),
}

/// Installs the global subscriber once per process.
pub(crate) fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).map(|_| ())
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = config.log_filter();
    let env_filter = EnvFilter::try_new(filter).map_err(|error| TelemetryError::Filter {
        filter: filter.to_owned(),
        message: error.to_string(),
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false);

    let installed = match config.log_format_or(default_runner_log_format()) {
        LogFormat::Compact => builder
            .with_ansi(io::stderr().is_terminal())
            .without_time()
            .compact()
            .try_init(),
        LogFormat::Json => builder
            .with_ansi(false)
            .with_timer(UtcTime::rfc_3339())
            .json()
            .flatten_event(true)
            .try_init(),
    };
    installed.map_err(|error| TelemetryError::Subscriber(error.to_string()))
}
