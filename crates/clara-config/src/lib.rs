//! Configuration shared by the CLARA manager daemon and acceptance runner.
//!
//! A single YAML document describes logging, the daemon listener and probe
//! schedules, the per-language command table, the node address book and the
//! suite directory. Each binary reads only the sections it needs; a missing
//! section surfaces as [`ConfigError::MissingSection`] at the point of use.

mod cli;
mod daemon;
mod defaults;
mod endpoint;
mod languages;
mod logging;

use std::collections::BTreeMap;
use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

pub use cli::ConfigArgs;
pub use daemon::{DaemonConfig, RetryPolicy};
pub use defaults::{
    DEFAULT_CONFIG_PATH, DEFAULT_LISTEN_HOST, DEFAULT_LOG_FILTER, DEFAULT_TESTS_DIR,
    default_daemon_log_format, default_runner_log_format,
};
pub use endpoint::{Endpoint, EndpointParseError};
pub use languages::{ClaraConfig, EnvOverlay, LanguageConfig, Role};
pub use logging::{LogFormat, LogFormatParseError, LoggingConfig};

/// Parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Daemon listener and probe settings.
    pub daemon: DaemonConfig,
    /// Runtime install locations and command table.
    pub clara: Option<ClaraConfig>,
    /// Node name to host address.
    pub nodes: Option<BTreeMap<String, String>>,
    /// Suite directory, relative to the configuration file when not absolute.
    pub tests: Option<Utf8PathBuf>,
    #[serde(skip)]
    base_dir: Option<Utf8PathBuf>,
}

/// Errors raised while loading or querying the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration '{path}': {source}")]
    Read {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid YAML for [`Config`].
    #[error("failed to parse configuration '{path}': {message}")]
    Parse {
        /// Configuration file path.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// A section required by the caller is absent or empty.
    #[error("Bad config file: missing {section}")]
    MissingSection {
        /// Name of the absent section.
        section: &'static str,
    },
}

impl Config {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load_from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.base_dir = path.parent().map(Utf8Path::to_path_buf);
        Ok(config)
    }

    /// Parses a YAML document. Relative paths resolve against the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns the parser diagnostic as text.
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(text).map_err(|error| error.to_string())
    }

    /// The `clara` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when it is absent.
    pub fn clara(&self) -> Result<&ClaraConfig, ConfigError> {
        self.clara
            .as_ref()
            .ok_or(ConfigError::MissingSection { section: "clara" })
    }

    /// The `nodes` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when it is absent or empty.
    pub fn nodes(&self) -> Result<&BTreeMap<String, String>, ConfigError> {
        self.nodes
            .as_ref()
            .filter(|nodes| !nodes.is_empty())
            .ok_or(ConfigError::MissingSection { section: "nodes" })
    }

    /// Directory holding suite files.
    #[must_use]
    pub fn tests_dir(&self) -> Utf8PathBuf {
        let dir = self.tests.clone().unwrap_or_else(defaults::default_tests_dir);
        match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir,
        }
    }

    /// The configured filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.logging.filter
    }

    /// The configured log format, or `fallback` when the file leaves it open.
    #[must_use]
    pub fn log_format_or(&self, fallback: LogFormat) -> LogFormat {
        self.logging.format.unwrap_or(fallback)
    }
}
