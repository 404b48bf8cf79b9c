//! Termination signals for the daemon.

use std::io;

use nix::sys::signal::Signal;
use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

/// Something the daemon can block on until it should stop.
pub trait ShutdownSignal {
    /// Blocks until shutdown should proceed.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError`] when the source can no longer deliver a
    /// notification.
    fn wait(&mut self) -> Result<(), ShutdownError>;
}

impl<T: ShutdownSignal + ?Sized> ShutdownSignal for &mut T {
    fn wait(&mut self) -> Result<(), ShutdownError> {
        (**self).wait()
    }
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registering the signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The signal iterator closed without delivering a signal.
    #[error("signal delivery stopped before a termination signal arrived")]
    Closed,
}

/// Waits for SIGTERM, SIGINT, SIGQUIT or SIGHUP.
///
/// Handlers are registered by [`SystemShutdownSignal::install`], so a
/// signal that arrives while the daemon is still binding is held until
/// [`ShutdownSignal::wait`] runs rather than killing the process outright.
pub struct SystemShutdownSignal {
    signals: Signals,
}

impl SystemShutdownSignal {
    /// Registers the termination handlers.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError::Install`] when registration fails.
    pub fn install() -> Result<Self, ShutdownError> {
        let signals = Signals::new([SIGTERM, SIGINT, SIGQUIT, SIGHUP])
            .map_err(|source| ShutdownError::Install { source })?;
        Ok(Self { signals })
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&mut self) -> Result<(), ShutdownError> {
        let raw = self.signals.forever().next().ok_or(ShutdownError::Closed)?;
        let name = Signal::try_from(raw).map_or_else(|_| raw.to_string(), |signal| signal.to_string());
        info!(target: PROCESS_TARGET, signal = %name, "shutdown signal received");
        Ok(())
    }
}
