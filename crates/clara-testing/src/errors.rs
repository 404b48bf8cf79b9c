//! Top-level errors of the acceptance runner.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use clara_config::ConfigError;

use crate::client::ClientError;
use crate::telemetry::TelemetryError;

/// Failures that abort a run before or after the suites execute.
#[derive(Debug, Error)]
pub enum AppError {
    /// Command-line parsing failed.
    #[error("{0}")]
    CliUsage(#[from] clap::Error),
    /// The configuration could not be loaded or lacks a section.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Logging could not be set up.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    /// A node could not be reached.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The suite directory could not be listed.
    #[error("failed to list suites in '{path}': {source}")]
    Discover {
        /// Suite directory.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The suite directory holds no suite files.
    #[error("no acceptance suites found in '{path}'")]
    NoSuites {
        /// Suite directory.
        path: Utf8PathBuf,
    },
    /// The report could not be written.
    #[error("failed to write report: {0}")]
    Report(#[source] io::Error),
}
