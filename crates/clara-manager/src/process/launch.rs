//! Daemon launch sequencing.

use tracing::info;

use clara_config::{ConfigArgs, Endpoint};

use crate::bootstrap::{ArgsConfigLoader, ConfigLoader};
use crate::dispatch::Dispatcher;
use crate::server::Server;
use crate::supervisor::{Supervisor, SupervisorSettings};
use crate::telemetry;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) shutdown: S,
    pub(crate) listen: Option<Endpoint>,
}

/// Runs the daemon until a termination signal arrives.
///
/// `listen` overrides the configured endpoint.
///
/// # Errors
///
/// Returns [`LaunchError`] when configuration, telemetry, the listener or
/// signal handling fails.
pub fn run_daemon(args: &ConfigArgs, listen: Option<Endpoint>) -> Result<(), LaunchError> {
    run_daemon_with(LaunchPlan {
        loader: ArgsConfigLoader::new(args.clone()),
        shutdown: SystemShutdownSignal::install()?,
        listen,
    })
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        mut shutdown,
        listen,
    } = plan;

    let config = loader.load()?;
    telemetry::initialise(&config)?;
    let settings = SupervisorSettings::from_config(&config)?;
    let endpoint = listen.unwrap_or_else(|| config.daemon.listen.clone());
    info!(
        target: PROCESS_TARGET,
        %endpoint,
        host_ip = settings.host_ip(),
        languages = ?settings.clara().languages.keys().collect::<Vec<_>>(),
        "starting manager daemon"
    );

    let server = Server::bind(&endpoint, Dispatcher::new(Supervisor::new(settings)))?;
    let running = server.start()?;
    let waited = shutdown.wait();
    running.shutdown()?;
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
