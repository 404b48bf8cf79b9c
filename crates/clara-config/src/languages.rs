//! Per-language command table for supervised processes.

use std::collections::BTreeMap;
use std::ffi::OsString;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The `clara` section: where the runtime lives and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClaraConfig {
    /// Root of the installed runtime services.
    pub services: Utf8PathBuf,
    /// Directory receiving process log files.
    pub logs: Utf8PathBuf,
    /// Address embedded in log file names; resolved from the host name when
    /// absent.
    #[serde(default)]
    pub host_ip: Option<String>,
    /// Launch settings keyed by language name.
    #[serde(default)]
    pub languages: BTreeMap<String, LanguageConfig>,
}

impl ClaraConfig {
    /// Looks up the launch settings for `language`.
    #[must_use]
    pub fn language(&self, language: &str) -> Option<&LanguageConfig> {
        self.languages.get(language)
    }
}

/// Which command of a language entry to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// The long-running platform process.
    Platform,
    /// The long-running data processing environment.
    Dpe,
    /// The one-shot helper answering standard requests.
    Orchestrator,
}

/// Launch settings for one language variant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LanguageConfig {
    /// Working directory for every command of this language.
    pub fullpath: Utf8PathBuf,
    /// Command line of the platform process.
    pub platform: String,
    /// Command line of the DPE process.
    pub dpe: String,
    /// Command line of the orchestrator helper, if the language ships one.
    #[serde(default)]
    pub orchestrator: Option<String>,
    /// Environment adjustment applied to every command.
    #[serde(default)]
    pub env: EnvOverlay,
}

impl LanguageConfig {
    /// Returns the command line configured for `role`.
    #[must_use]
    pub fn command(&self, role: Role) -> Option<&str> {
        match role {
            Role::Platform => Some(self.platform.as_str()),
            Role::Dpe => Some(self.dpe.as_str()),
            Role::Orchestrator => self.orchestrator.as_deref(),
        }
    }
}

/// How a language exposes its install location to child processes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvOverlay {
    /// Leave the inherited environment alone.
    #[default]
    None,
    /// Prepend `fullpath` to a `:`-separated search path such as
    /// `PYTHONPATH`.
    PrependPath {
        /// Variable to extend.
        variable: String,
    },
    /// Export `fullpath` in a variable such as `CLARA_SERVICES`.
    Set {
        /// Variable to set.
        variable: String,
    },
}

impl EnvOverlay {
    /// Computes the variable to export for a child, given the parent's
    /// current value of it.
    pub fn resolve(
        &self,
        fullpath: &Utf8Path,
        current: impl FnOnce(&str) -> Option<OsString>,
    ) -> Option<(String, OsString)> {
        match self {
            Self::None => None,
            Self::Set { variable } => Some((variable.clone(), OsString::from(fullpath.as_str()))),
            Self::PrependPath { variable } => {
                let mut value = OsString::from(fullpath.as_str());
                if let Some(existing) = current(variable).filter(|existing| !existing.is_empty()) {
                    value.push(":");
                    value.push(existing);
                }
                Some((variable.clone(), value))
            }
        }
    }
}
