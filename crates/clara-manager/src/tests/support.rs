//! Scripted stand-ins for the operating system.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use camino::Utf8PathBuf;
use tempfile::TempDir;

use clara_config::{ClaraConfig, DaemonConfig, EnvOverlay, LanguageConfig};

use crate::dispatch::Dispatcher;
use crate::supervisor::{
    CapturedOutput, ChildProcess, Clock, CommandSpec, LogFiles, Spawner, Supervisor,
    SupervisorSettings,
};

/// How a scripted child reacts to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behaviour {
    /// Runs until terminated.
    StaysUp,
    /// Exits before the first start probe.
    ExitsImmediately,
    /// Survives SIGTERM and only dies when killed.
    IgnoresTerm,
}

#[derive(Default)]
struct FakeState {
    behaviours: HashMap<String, Behaviour>,
    queued: VecDeque<Box<dyn ChildProcess>>,
    spawned: Vec<CommandSpec>,
    runs: Vec<CommandSpec>,
    output: CapturedOutput,
    run_fails: bool,
    events: Vec<String>,
    next_pid: u32,
}

/// Shared handle onto the scripted system; clones observe the same state.
#[derive(Clone, Default)]
pub(crate) struct FakeSystem {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSystem {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake system poisoned")
    }

    pub(crate) fn behave(&self, program: &str, behaviour: Behaviour) {
        self.lock().behaviours.insert(program.to_owned(), behaviour);
    }

    pub(crate) fn queue_child(&self, child: Box<dyn ChildProcess>) {
        self.lock().queued.push_back(child);
    }

    pub(crate) fn set_output(&self, output: CapturedOutput) {
        self.lock().output = output;
    }

    pub(crate) fn fail_runs(&self) {
        self.lock().run_fails = true;
    }

    pub(crate) fn spawned(&self) -> Vec<CommandSpec> {
        self.lock().spawned.clone()
    }

    pub(crate) fn runs(&self) -> Vec<CommandSpec> {
        self.lock().runs.clone()
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.lock().events.clone()
    }

    fn record(&self, event: String) {
        self.lock().events.push(event);
    }

    pub(crate) fn spawner(&self) -> Box<dyn Spawner> {
        Box::new(FakeSpawner {
            system: self.clone(),
        })
    }
}

struct FakeSpawner {
    system: FakeSystem,
}

impl Spawner for FakeSpawner {
    fn spawn(&self, command: &CommandSpec, _logs: &LogFiles) -> io::Result<Box<dyn ChildProcess>> {
        let mut state = self.system.lock();
        state.spawned.push(command.clone());
        if let Some(child) = state.queued.pop_front() {
            return Ok(child);
        }
        state.next_pid += 1;
        let behaviour = state
            .behaviours
            .get(&command.program)
            .copied()
            .unwrap_or(Behaviour::StaysUp);
        Ok(Box::new(ScriptedChild {
            label: command.program.clone(),
            pid: state.next_pid,
            behaviour,
            terminated: false,
            killed: false,
            system: self.system.clone(),
        }))
    }

    fn run(&self, command: &CommandSpec) -> io::Result<CapturedOutput> {
        let mut state = self.system.lock();
        state.runs.push(command.clone());
        if state.run_fails {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }
        Ok(state.output.clone())
    }
}

struct ScriptedChild {
    label: String,
    pid: u32,
    behaviour: Behaviour,
    terminated: bool,
    killed: bool,
    system: FakeSystem,
}

impl ChildProcess for ScriptedChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        Ok(match self.behaviour {
            Behaviour::ExitsImmediately => true,
            Behaviour::StaysUp => self.terminated || self.killed,
            Behaviour::IgnoresTerm => self.killed,
        })
    }

    fn terminate(&mut self) -> io::Result<()> {
        self.terminated = true;
        self.system.record(format!("terminate {}", self.label));
        Ok(())
    }

    fn kill(&mut self) -> io::Result<()> {
        self.killed = true;
        self.system.record(format!("kill {}", self.label));
        Ok(())
    }

    fn wait(&mut self) -> io::Result<()> {
        self.system.record(format!("wait {}", self.label));
        Ok(())
    }
}

/// Clock that records requested sleeps instead of sleeping.
#[derive(Clone, Default)]
pub(crate) struct RecordingClock {
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingClock {
    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().expect("clock poisoned").clone()
    }

    pub(crate) fn boxed(&self) -> Box<dyn Clock> {
        Box::new(self.clone())
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.lock().expect("clock poisoned").push(duration);
    }
}

/// A supervisor wired to the fake system, with logs in a temp directory.
pub(crate) struct Harness {
    logs: TempDir,
    pub(crate) system: FakeSystem,
    pub(crate) clock: RecordingClock,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self {
            logs: TempDir::new().expect("temp log dir"),
            system: FakeSystem::default(),
            clock: RecordingClock::default(),
        }
    }

    pub(crate) fn log_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.logs.path().to_path_buf()).expect("utf-8 temp dir")
    }

    pub(crate) fn settings(&self) -> SupervisorSettings {
        let mut languages = std::collections::BTreeMap::new();
        languages.insert(
            String::from("java"),
            LanguageConfig {
                fullpath: Utf8PathBuf::from("/opt/clara/services"),
                platform: String::from("java-platform"),
                dpe: String::from("java-dpe -log"),
                orchestrator: Some(String::from("java-orchestrator --verbose")),
                env: EnvOverlay::Set {
                    variable: String::from("CLARA_SERVICES"),
                },
            },
        );
        languages.insert(
            String::from("python"),
            LanguageConfig {
                fullpath: Utf8PathBuf::from("/opt/clara/python"),
                platform: String::from("python-platform"),
                dpe: String::from("python-dpe"),
                orchestrator: None,
                env: EnvOverlay::PrependPath {
                    variable: String::from("PYTHONPATH"),
                },
            },
        );
        let clara = ClaraConfig {
            services: Utf8PathBuf::from("/opt/clara/services"),
            logs: self.log_dir(),
            host_ip: Some(String::from("127.0.0.1")),
            languages,
        };
        SupervisorSettings::new(clara, &DaemonConfig::default())
    }

    pub(crate) fn supervisor(&self) -> Supervisor {
        Supervisor::with_collaborators(
            self.settings(),
            self.system.spawner(),
            self.clock.boxed(),
        )
    }

    pub(crate) fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.supervisor())
    }
}

/// Converts a response into comparable parts.
pub(crate) fn parts(response: clara_protocol::Response) -> Vec<String> {
    response.into_parts()
}
