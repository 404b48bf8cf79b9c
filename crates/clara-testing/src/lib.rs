//! Acceptance testing for CLARA deployments.
//!
//! The crate holds a multi-node client for `clara-manager` daemons, the
//! small action grammar suite files are written in, and the runner that
//! replays every suite and prints one verdict per suite. The binary entry
//! point is a thin wrapper around [`run`], which takes its IO streams as
//! parameters so tests can capture the report.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;

use clara_config::ConfigArgs;

mod client;
mod dsl;
mod errors;
mod runner;
mod scenario;
mod suite;
mod telemetry;
mod transport;

pub use client::{ClientError, DaemonClient, Requester, validate_response};
pub use dsl::{
    ActionError, DEFAULT_LANGUAGE, ITEM_PLACEHOLDER, PLATFORM_NODE, ParsedAction, parse_action,
};
pub use errors::AppError;
pub use runner::{TestRunner, discover_suites};
pub use scenario::{AcceptanceTest, TestCase, TestError};
pub use suite::{SuiteError, SuiteReport, TestSuite, suite_stem};
pub use telemetry::TelemetryError;
pub use transport::{RequestChannel, TcpChannel};

const RUNNER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::runner");

/// Runs CLARA acceptance suites against the configured nodes.
#[derive(Debug, Parser)]
#[command(name = "clara-acceptance", version, about)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,
    /// Directory to discover suites in, overriding `tests`.
    #[arg(long)]
    tests_dir: Option<Utf8PathBuf>,
    /// Suite files to run instead of discovering them.
    suites: Vec<Utf8PathBuf>,
}

/// Parses `args`, runs the selected suites and writes the report.
///
/// Returns success only when every suite passed.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            let _ = writeln!(stderr, "{}", AppError::CliUsage(error));
            return ExitCode::FAILURE;
        }
    };

    match execute(&cli, stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            let _ = writeln!(stderr, "clara-acceptance: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W) -> Result<bool, AppError> {
    let config = cli.config.load()?;
    telemetry::initialise(&config)?;
    let nodes = config.nodes()?;

    let files = if cli.suites.is_empty() {
        let dir = cli.tests_dir.clone().unwrap_or_else(|| config.tests_dir());
        discover_suites(&dir)?
    } else {
        cli.suites.clone()
    };
    info!(target: RUNNER_TARGET, suites = files.len(), nodes = nodes.len(), "starting run");

    let client = DaemonClient::connect(nodes, config.daemon.port)?;
    let mut runner = TestRunner::new(client);
    runner.run_all(&files);
    runner.print_report(stdout).map_err(AppError::Report)?;
    Ok(runner.all_passed())
}

#[cfg(test)]
mod tests;
