use clara_config::{ClaraConfig, Config, ConfigError, DaemonConfig, LanguageConfig, RetryPolicy};

use crate::host;

/// Immutable inputs of the supervisor, resolved once at daemon start.
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    clara: ClaraConfig,
    host_ip: String,
    start_probe: RetryPolicy,
    stop_probe: RetryPolicy,
}

impl SupervisorSettings {
    /// Combines the runtime section with the daemon probe schedules.
    ///
    /// The host address embedded in log names comes from
    /// [`ClaraConfig::host_ip`] or, failing that, from resolving the local
    /// host name.
    #[must_use]
    pub fn new(clara: ClaraConfig, daemon: &DaemonConfig) -> Self {
        let host_ip = host::resolve_host_ip(clara.host_ip.as_deref());
        Self {
            clara,
            host_ip,
            start_probe: daemon.start_probe,
            stop_probe: daemon.stop_probe,
        }
    }

    /// Builds settings from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSection`] when the `clara` section is
    /// absent.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(config.clara()?.clone(), &config.daemon))
    }

    /// Launch settings for `language`, if configured.
    #[must_use]
    pub fn language(&self, language: &str) -> Option<&LanguageConfig> {
        self.clara.language(language)
    }

    /// Address embedded in log file names.
    #[must_use]
    pub fn host_ip(&self) -> &str {
        &self.host_ip
    }

    /// Runtime section these settings were built from.
    #[must_use]
    pub fn clara(&self) -> &ClaraConfig {
        &self.clara
    }

    pub(crate) fn start_probe(&self) -> RetryPolicy {
        self.start_probe
    }

    pub(crate) fn stop_probe(&self) -> RetryPolicy {
        self.stop_probe
    }
}
