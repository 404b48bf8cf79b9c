use camino::Utf8PathBuf;
use clap::Args;

use crate::defaults::DEFAULT_CONFIG_PATH;
use crate::logging::LogFormat;
use crate::{Config, ConfigError};

/// Command-line options shared by every CLARA binary.
///
/// Each flag can also be supplied through its environment variable; flags
/// win over the environment and both win over the file.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Path to the YAML configuration file.
    #[arg(long = "config-path", env = "CLARA_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: Utf8PathBuf,
    /// Overrides the `tracing` filter expression.
    #[arg(long, env = "CLARA_LOG_FILTER")]
    pub log_filter: Option<String>,
    /// Overrides the log output format (`json` or `compact`).
    #[arg(long, env = "CLARA_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl ConfigArgs {
    /// Loads the configuration file and applies the logging overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config = Config::load_from_path(&self.config_path)?;
        if let Some(filter) = &self.log_filter {
            config.logging.filter.clone_from(filter);
        }
        if let Some(format) = self.log_format {
            config.logging.format = Some(format);
        }
        Ok(config)
    }
}
