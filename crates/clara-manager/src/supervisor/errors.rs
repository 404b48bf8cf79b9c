use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

use super::ProcessKey;

/// Failures reported by [`super::Supervisor`] operations.
///
/// Variants for which [`SupervisorError::is_domain`] returns `true` carry
/// operator-facing messages that are relayed to clients verbatim. The rest
/// describe internal faults.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The language has no entry in the command table.
    #[error("Bad language: {language}")]
    BadLanguage { language: String },
    /// The instance is neither `platform` nor `dpe`.
    #[error("Bad instance: {instance}")]
    BadInstance { instance: String },
    /// A process with the same key is already supervised.
    #[error("{key} already running!")]
    AlreadyRunning { key: ProcessKey },
    /// No process with this key is supervised.
    #[error("{key} is not running!")]
    NotRunning { key: ProcessKey },
    /// The child exited inside the start-up window.
    #[error("Could not start {key}")]
    StartFailure { key: ProcessKey },
    /// The request name is not a known standard request.
    #[error("Unsupported request: {request}")]
    UnsupportedRequest { request: String },
    /// The language has no orchestrator helper configured.
    #[error("No orchestrator configured for {language}")]
    MissingOrchestrator { language: String },
    /// The child ignored the termination signal and was killed.
    #[error("{key} did not terminate and has been killed")]
    ForcedKill { key: ProcessKey },
    /// A configured command line was blank.
    #[error("empty command line configured for {target}")]
    EmptyCommand { target: String },
    /// A log file could not be created.
    #[error("failed to open log file '{path}': {source}")]
    LogFile {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// The operating system refused to spawn a command.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// Signalling or reaping a supervised child failed.
    #[error("failed to control {key}: {source}")]
    Control {
        key: ProcessKey,
        #[source]
        source: io::Error,
    },
}

impl SupervisorError {
    /// Whether the error is an expected, operator-facing outcome rather than
    /// an internal fault.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::BadLanguage { .. }
                | Self::BadInstance { .. }
                | Self::AlreadyRunning { .. }
                | Self::NotRunning { .. }
                | Self::StartFailure { .. }
                | Self::UnsupportedRequest { .. }
                | Self::MissingOrchestrator { .. }
        )
    }

    pub(crate) fn control(key: &ProcessKey, source: io::Error) -> Self {
        Self::Control {
            key: key.clone(),
            source,
        }
    }
}
