//! Command lines, environment and log targets derived from the command
//! table.

use std::env;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::process::{Command, Stdio};

use camino::{Utf8Path, Utf8PathBuf};

use clara_config::{LanguageConfig, Role};
use clara_protocol::StandardRequest;

use super::{ProcessKey, SupervisorError, SupervisorSettings};

/// A fully resolved command, ready to hand to a [`super::Spawner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable, resolved against `cwd` when relative.
    pub program: String,
    /// Arguments following the executable.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: Utf8PathBuf,
    /// Variables exported on top of the inherited environment.
    pub env: Vec<(String, OsString)>,
}

impl CommandSpec {
    /// Splits the configured command line for `role` of `language` on
    /// whitespace and applies the language's environment overlay.
    pub(crate) fn for_role(
        language: &str,
        config: &LanguageConfig,
        role: Role,
    ) -> Result<Self, SupervisorError> {
        let target = format!("{language}/{role}");
        let line = config
            .command(role)
            .ok_or_else(|| SupervisorError::MissingOrchestrator {
                language: language.to_owned(),
            })?;
        let mut words = line.split_whitespace().map(str::to_owned);
        let program = words
            .next()
            .ok_or(SupervisorError::EmptyCommand { target })?;
        let env = config
            .env
            .resolve(&config.fullpath, |name| env::var_os(name))
            .into_iter()
            .collect();
        Ok(Self {
            program,
            args: words.collect(),
            cwd: config.fullpath.clone(),
            env,
        })
    }

    /// The orchestrator invocation answering `request`.
    pub(crate) fn for_request(
        language: &str,
        config: &LanguageConfig,
        request: StandardRequest,
    ) -> Result<Self, SupervisorError> {
        let mut spec = Self::for_role(language, config, Role::Orchestrator)?;
        spec.args.push(request.to_string());
        Ok(spec)
    }

    /// Builds a [`Command`] with the working directory and environment
    /// applied. Stdio is left to the caller.
    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(self.program_path().as_std_path());
        command
            .args(&self.args)
            .current_dir(self.cwd.as_std_path())
            .envs(self.env.iter().map(|(name, value)| (name, value)));
        command
    }

    /// Paths with a directory part are anchored at `cwd`; bare names are
    /// looked up on `PATH`.
    fn program_path(&self) -> Utf8PathBuf {
        let program = Utf8Path::new(&self.program);
        if program.is_relative() && program.components().count() > 1 {
            self.cwd.join(program)
        } else {
            program.to_path_buf()
        }
    }
}

/// Where a supervised process writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTargets {
    /// Receives standard output.
    pub stdout: Utf8PathBuf,
    /// Receives standard error.
    pub stderr: Utf8PathBuf,
}

impl LogTargets {
    /// `{logs}/{host}-{language}-{instance}.log` and `.err`.
    pub(crate) fn for_key(settings: &SupervisorSettings, key: &ProcessKey) -> Self {
        let stem = format!("{}-{}-{}", settings.host_ip(), key.language(), key.instance());
        let dir = &settings.clara().logs;
        Self {
            stdout: dir.join(format!("{stem}.log")),
            stderr: dir.join(format!("{stem}.err")),
        }
    }
}

/// Open log handles owned by a running process record.
#[derive(Debug)]
pub struct LogFiles {
    stdout: File,
    stderr: File,
}

impl LogFiles {
    /// Creates or truncates both log files.
    pub(crate) fn create(targets: &LogTargets) -> Result<Self, SupervisorError> {
        Ok(Self {
            stdout: open_log(&targets.stdout)?,
            stderr: open_log(&targets.stderr)?,
        })
    }

    /// Duplicated handles for a child's standard output and error.
    ///
    /// # Errors
    ///
    /// Returns the IO error raised while duplicating a descriptor.
    pub fn stdio(&self) -> io::Result<(Stdio, Stdio)> {
        Ok((
            Stdio::from(self.stdout.try_clone()?),
            Stdio::from(self.stderr.try_clone()?),
        ))
    }
}

fn open_log(path: &Utf8Path) -> Result<File, SupervisorError> {
    let open = || -> io::Result<File> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
    };
    open().map_err(|source| SupervisorError::LogFile {
        path: path.to_path_buf(),
        source,
    })
}
