//! The process table and its start/stop protocol.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, info, warn};

use clara_config::LanguageConfig;
use clara_protocol::StandardRequest;

use super::{
    CapturedOutput, ChildProcess, Clock, CommandSpec, Instance, LogFiles, LogTargets, PollState,
    ProcessKey, SUPERVISOR_TARGET, Spawner, SupervisorError, SupervisorSettings, SystemClock,
    SystemSpawner, poll_until,
};

/// One supervised child together with the log handles it writes to.
///
/// Dropping the record closes both logs.
struct RunningProcess {
    child: Box<dyn ChildProcess>,
    _logs: LogFiles,
}

/// Owns every running platform and DPE process.
///
/// A key is present in the table exactly while its process is supervised.
pub struct Supervisor {
    settings: SupervisorSettings,
    spawner: Box<dyn Spawner>,
    clock: Box<dyn Clock>,
    table: BTreeMap<ProcessKey, RunningProcess>,
}

impl Supervisor {
    /// Builds a supervisor that drives real processes.
    #[must_use]
    pub fn new(settings: SupervisorSettings) -> Self {
        Self::with_collaborators(settings, Box::new(SystemSpawner), Box::new(SystemClock))
    }

    /// Builds a supervisor with injected process and clock seams.
    #[must_use]
    pub fn with_collaborators(
        settings: SupervisorSettings,
        spawner: Box<dyn Spawner>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            spawner,
            clock,
            table: BTreeMap::new(),
        }
    }

    /// Starts the `instance` process of `language`.
    ///
    /// The child is watched for the start-up window; one that exits inside
    /// it is reported as [`SupervisorError::StartFailure`] and never enters
    /// the table.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::BadLanguage`], [`SupervisorError::BadInstance`]
    /// or [`SupervisorError::AlreadyRunning`] before touching the system, and
    /// internal variants when logs or the child cannot be set up.
    pub fn start(&mut self, language: &str, instance: &str) -> Result<(), SupervisorError> {
        let (key, config) = self.resolve(language, instance)?;
        if self.table.contains_key(&key) {
            return Err(SupervisorError::AlreadyRunning { key });
        }
        let command = CommandSpec::for_role(language, config, key.instance().role())?;
        let logs = LogFiles::create(&LogTargets::for_key(&self.settings, &key))?;
        let child = self
            .spawner
            .spawn(&command, &logs)
            .map_err(|source| SupervisorError::Spawn {
                program: command.program.clone(),
                source,
            })?;
        let mut record = RunningProcess { child, _logs: logs };
        let pid = record.child.id();
        info!(target: SUPERVISOR_TARGET, %key, pid, program = %command.program, "process spawned");

        let polled = poll_until(self.settings.start_probe(), self.clock.as_ref(), || {
            exit_state(record.child.as_mut())
        });
        let state = match polled {
            Ok(state) => state,
            Err(source) => {
                warn!(target: SUPERVISOR_TARGET, %key, pid, error = %source, "start probe failed, killing");
                if let Err(error) = record.child.kill().and_then(|()| record.child.wait()) {
                    warn!(target: SUPERVISOR_TARGET, %key, pid, %error, "could not reap abandoned child");
                }
                return Err(SupervisorError::control(&key, source));
            }
        };
        if state == PollState::Ready {
            warn!(target: SUPERVISOR_TARGET, %key, pid, "process exited during start-up");
            return Err(SupervisorError::StartFailure { key });
        }
        self.table.insert(key, record);
        Ok(())
    }

    /// Stops the `instance` process of `language` and removes it from the
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::NotRunning`] for unknown keys, and
    /// [`SupervisorError::ForcedKill`] when the child had to be killed. The
    /// record is gone and its logs are closed in both cases.
    pub fn stop(&mut self, language: &str, instance: &str) -> Result<(), SupervisorError> {
        let (key, _) = self.resolve(language, instance)?;
        let record = self
            .table
            .remove(&key)
            .ok_or_else(|| SupervisorError::NotRunning { key: key.clone() })?;
        self.terminate(&key, record)
    }

    /// Stops every supervised process, carrying on past individual failures.
    pub fn stop_all(&mut self) {
        let table = std::mem::take(&mut self.table);
        if !table.is_empty() {
            info!(target: SUPERVISOR_TARGET, count = table.len(), "stopping all processes");
        }
        for (key, record) in table {
            if let Err(error) = self.terminate(&key, record) {
                warn!(target: SUPERVISOR_TARGET, %key, %error, "stop failed during stop-all");
            }
        }
    }

    /// Runs the orchestrator helper of `language` for the standard request
    /// named `request` and returns its captured output.
    ///
    /// # Errors
    ///
    /// Returns [`SupervisorError::BadLanguage`],
    /// [`SupervisorError::UnsupportedRequest`],
    /// [`SupervisorError::MissingOrchestrator`] or
    /// [`SupervisorError::Spawn`].
    pub fn run_standard_request(
        &self,
        language: &str,
        request: &str,
    ) -> Result<CapturedOutput, SupervisorError> {
        let config = self.language(language)?;
        let standard = StandardRequest::from_str(request).map_err(|_| {
            SupervisorError::UnsupportedRequest {
                request: request.to_owned(),
            }
        })?;
        let command = CommandSpec::for_request(language, config, standard)?;
        debug!(
            target: SUPERVISOR_TARGET,
            language,
            request,
            program = %command.program,
            "running orchestrator request"
        );
        let output = self
            .spawner
            .run(&command)
            .map_err(|source| SupervisorError::Spawn {
                program: command.program.clone(),
                source,
            })?;
        info!(
            target: SUPERVISOR_TARGET,
            language,
            request,
            code = ?output.code,
            "orchestrator request finished"
        );
        Ok(output)
    }

    /// Whether the given process is in the table.
    #[must_use]
    pub fn is_running(&self, language: &str, instance: Instance) -> bool {
        self.table
            .contains_key(&ProcessKey::new(language, instance))
    }

    /// Keys of every supervised process, in order.
    pub fn running(&self) -> impl Iterator<Item = &ProcessKey> {
        self.table.keys()
    }

    fn language(&self, language: &str) -> Result<&LanguageConfig, SupervisorError> {
        self.settings
            .language(language)
            .ok_or_else(|| SupervisorError::BadLanguage {
                language: language.to_owned(),
            })
    }

    fn resolve(
        &self,
        language: &str,
        instance: &str,
    ) -> Result<(ProcessKey, &LanguageConfig), SupervisorError> {
        let config = self.language(language)?;
        let parsed = Instance::from_str(instance).map_err(|_| SupervisorError::BadInstance {
            instance: instance.to_owned(),
        })?;
        Ok((ProcessKey::new(language, parsed), config))
    }

    /// SIGTERM, wait out the stop window, then SIGKILL if needed.
    ///
    /// The window only closes once the whole process group is gone, so a
    /// launcher script whose children ignore SIGTERM still escalates.
    fn terminate(&self, key: &ProcessKey, mut record: RunningProcess) -> Result<(), SupervisorError> {
        let pid = record.child.id();
        record
            .child
            .terminate()
            .map_err(|source| SupervisorError::control(key, source))?;
        let state = poll_until(self.settings.stop_probe(), self.clock.as_ref(), || {
            exit_state(record.child.as_mut())
        })
        .map_err(|source| SupervisorError::control(key, source))?;

        if state == PollState::Ready {
            info!(target: SUPERVISOR_TARGET, %key, pid, "process stopped");
            return Ok(());
        }

        warn!(target: SUPERVISOR_TARGET, %key, pid, "process ignored termination, killing");
        record
            .child
            .kill()
            .and_then(|()| record.child.wait())
            .map_err(|source| SupervisorError::control(key, source))?;
        Err(SupervisorError::ForcedKill { key: key.clone() })
    }
}

fn exit_state(child: &mut dyn ChildProcess) -> std::io::Result<PollState> {
    Ok(if child.has_exited()? {
        PollState::Ready
    } else {
        PollState::NotReady
    })
}
