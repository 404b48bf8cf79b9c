//! Process supervisor daemon for the CLARA runtime.
//!
//! The daemon listens on a TCP endpoint for single-line requests of the form
//! `clara:<action>:<language>:<argument>` and answers each with a multipart
//! status frame. `start` and `stop` manage long-running platform and DPE
//! processes; `request` runs a language's orchestrator helper once and
//! relays its output.
//!
//! Requests are executed one at a time by a single dispatch thread that owns
//! the [`Supervisor`]. On shutdown every supervised process is stopped before
//! the daemon exits.

mod bootstrap;
mod dispatch;
mod host;
mod process;
mod server;
pub mod supervisor;
mod telemetry;
mod transport;

pub use bootstrap::{ArgsConfigLoader, ConfigLoader, StaticConfigLoader};
pub use dispatch::{DispatchError, Dispatcher};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use server::{RunningServer, Server, ServerError};
pub use supervisor::{Supervisor, SupervisorError, SupervisorSettings};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
