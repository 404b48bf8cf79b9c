//! Process supervision for platform and DPE instances.
//!
//! The [`Supervisor`] owns a table of running children keyed by language and
//! instance. It is driven from a single thread, so the table needs no lock.
//! Spawning, signalling and sleeping go through the [`Spawner`],
//! [`ChildProcess`] and [`Clock`] traits so tests can replace the operating
//! system.

mod child;
mod errors;
mod key;
mod launch_spec;
mod retry;
mod settings;
mod table;

pub use child::{CapturedOutput, ChildProcess, Spawner, SystemChild, SystemSpawner};
pub use errors::SupervisorError;
pub use key::{Instance, ProcessKey};
pub use launch_spec::{CommandSpec, LogFiles, LogTargets};
pub use retry::{Clock, PollState, SystemClock, poll_until};
pub use settings::SupervisorSettings;
pub use table::Supervisor;

pub(crate) const SUPERVISOR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::supervisor");
