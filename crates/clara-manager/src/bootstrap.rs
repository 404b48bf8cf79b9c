//! Configuration sources for the daemon.

use clara_config::{Config, ConfigArgs, ConfigError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader {
    /// Loads the daemon configuration.
    fn load(&self) -> Result<Config, ConfigError>;
}

/// Loader reading the file named on the command line.
#[derive(Debug, Clone)]
pub struct ArgsConfigLoader {
    args: ConfigArgs,
}

impl ArgsConfigLoader {
    /// Wraps parsed command-line arguments.
    #[must_use]
    pub fn new(args: ConfigArgs) -> Self {
        Self { args }
    }
}

impl ConfigLoader for ArgsConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        self.args.load()
    }
}

/// Loader returning a pre-built configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an existing configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, ConfigError> {
        Ok(self.config.clone())
    }
}
