//! Operating-system seams: spawning commands and signalling children.

use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;

use super::{CommandSpec, LogFiles};

/// Output of a one-shot command run to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output split into lines.
    pub stdout: Vec<String>,
    /// Standard error split into lines.
    pub stderr: Vec<String>,
    /// Exit code, absent when the command died from a signal.
    pub code: Option<i32>,
}

impl CapturedOutput {
    /// Builds captured output from raw bytes.
    #[must_use]
    pub fn from_bytes(stdout: &[u8], stderr: &[u8], code: Option<i32>) -> Self {
        Self {
            stdout: split_lines(stdout),
            stderr: split_lines(stderr),
            code,
        }
    }

    /// Exit code zero and nothing written to standard error.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.code == Some(0) && self.stderr.iter().all(String::is_empty)
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_owned)
        .collect()
}

/// Starts supervised children and runs one-shot helpers.
pub trait Spawner: Send {
    /// Spawns a long-running child in its own process group with output
    /// redirected to `logs`.
    fn spawn(&self, command: &CommandSpec, logs: &LogFiles) -> io::Result<Box<dyn ChildProcess>>;

    /// Runs `command` with captured output and waits for it to exit.
    fn run(&self, command: &CommandSpec) -> io::Result<CapturedOutput>;
}

/// Control surface of one supervised child.
pub trait ChildProcess: Send {
    /// Operating-system process identifier.
    fn id(&self) -> u32;

    /// Whether the child and every other member of its process group have
    /// exited. Reaps the child when it has.
    fn has_exited(&mut self) -> io::Result<bool>;

    /// Asks the child's process group to terminate.
    fn terminate(&mut self) -> io::Result<()>;

    /// Kills the child's process group.
    fn kill(&mut self) -> io::Result<()>;

    /// Blocks until the child itself has exited.
    fn wait(&mut self) -> io::Result<()>;
}

/// [`Spawner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn(&self, command: &CommandSpec, logs: &LogFiles) -> io::Result<Box<dyn ChildProcess>> {
        adopt_orphans();
        let (stdout, stderr) = logs.stdio()?;
        let child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .process_group(0)
            .spawn()?;
        Ok(Box::new(SystemChild { child }))
    }

    fn run(&self, command: &CommandSpec) -> io::Result<CapturedOutput> {
        let output = command.to_command().stdin(Stdio::null()).output()?;
        Ok(CapturedOutput::from_bytes(
            &output.stdout,
            &output.stderr,
            output.status.code(),
        ))
    }
}

/// Makes this process the reaper of orphaned descendants, so group members
/// left behind by an exiting launcher can be waited for instead of lingering
/// as zombies under init.
#[cfg(target_os = "linux")]
fn adopt_orphans() {
    use once_cell::sync::OnceCell;
    use tracing::warn;

    use super::SUPERVISOR_TARGET;

    static ADOPTED: OnceCell<()> = OnceCell::new();
    ADOPTED.get_or_init(|| {
        if let Err(errno) = nix::sys::prctl::set_child_subreaper(true) {
            warn!(target: SUPERVISOR_TARGET, %errno, "cannot adopt orphaned processes");
        }
    });
}

#[cfg(not(target_os = "linux"))]
fn adopt_orphans() {}

/// A spawned child leading its own process group.
#[derive(Debug)]
pub struct SystemChild {
    child: Child,
}

impl SystemChild {
    /// The child was spawned as a group leader, so its pid names the group.
    fn group(&self) -> io::Result<Pid> {
        let raw = i32::try_from(self.child.id())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
        Ok(Pid::from_raw(raw))
    }

    fn signal_group(&self, signal: Signal) -> io::Result<()> {
        match killpg(self.group()?, signal) {
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }

    /// Reaps group members that were orphaned onto this process. Only safe
    /// once the leader itself has been reaped through [`Child`].
    fn reap_adopted(&self) -> io::Result<()> {
        let members = Pid::from_raw(-self.group()?.as_raw());
        while let Ok(status) = waitpid(members, Some(WaitPidFlag::WNOHANG)) {
            if status == WaitStatus::StillAlive {
                break;
            }
        }
        Ok(())
    }

    /// Probes the group with the null signal. The group outlives its leader
    /// while any descendant that stayed in it is still running.
    fn group_alive(&self) -> io::Result<bool> {
        match killpg(self.group()?, None::<Signal>) {
            Ok(()) | Err(Errno::EPERM) => Ok(true),
            Err(Errno::ESRCH) => Ok(false),
            Err(errno) => Err(io::Error::from(errno)),
        }
    }
}

impl ChildProcess for SystemChild {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn has_exited(&mut self) -> io::Result<bool> {
        if self.child.try_wait()?.is_none() {
            return Ok(false);
        }
        self.reap_adopted()?;
        Ok(!self.group_alive()?)
    }

    fn terminate(&mut self) -> io::Result<()> {
        self.signal_group(Signal::SIGTERM)
    }

    fn kill(&mut self) -> io::Result<()> {
        self.signal_group(Signal::SIGKILL)
    }

    fn wait(&mut self) -> io::Result<()> {
        self.child.wait()?;
        self.reap_adopted()
    }
}
