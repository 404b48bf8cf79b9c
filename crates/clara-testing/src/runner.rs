//! Drives every suite file against one client.

use std::fs;
use std::io::{self, Write};

use camino::{Utf8Path, Utf8PathBuf};
use tracing::error;

use crate::client::Requester;
use crate::errors::AppError;
use crate::suite::{SuiteReport, TestSuite, suite_stem};

const SUITE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::suite");
const SUITE_EXTENSION: &str = "yaml";

/// Owns the client for a whole run and collects one report per suite.
pub struct TestRunner<R> {
    client: R,
    reports: Vec<SuiteReport>,
}

impl<R: Requester> TestRunner<R> {
    /// Creates a runner over `client`.
    pub const fn new(client: R) -> Self {
        Self {
            client,
            reports: Vec::new(),
        }
    }

    /// Loads and runs each suite file in order.
    ///
    /// A file that cannot be loaded is reported as failed under its stem
    /// and the run continues.
    pub fn run_all(&mut self, files: &[Utf8PathBuf]) -> &[SuiteReport] {
        self.reports.clear();
        for file in files {
            let report = match TestSuite::load(file) {
                Ok(suite) => suite.run(&mut self.client),
                Err(failure) => {
                    error!(target: SUITE_TARGET, path = %file, %failure, "suite not loaded");
                    SuiteReport::failed(suite_stem(file))
                }
            };
            self.reports.push(report);
        }
        &self.reports
    }

    /// Reports collected by the last run.
    #[must_use]
    pub fn reports(&self) -> &[SuiteReport] {
        &self.reports
    }

    /// Whether every collected suite passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.reports.iter().all(|report| report.passed)
    }

    /// Writes one `PASS`/`FAIL` line per suite followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns the writer's IO error.
    pub fn print_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for report in &self.reports {
            let verdict = if report.passed { "PASS" } else { "FAIL" };
            writeln!(out, "{verdict} {}", report.name)?;
        }
        let passed = self.reports.iter().filter(|report| report.passed).count();
        writeln!(
            out,
            "{passed} passed, {} failed",
            self.reports.len() - passed
        )
    }

    /// Gives the client back.
    pub fn into_client(self) -> R {
        self.client
    }
}

/// Lists the `*.yaml` files in `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`AppError::Discover`] when the directory cannot be listed and
/// [`AppError::NoSuites`] when it holds no suite files.
pub fn discover_suites(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, AppError> {
    let discover = |source| AppError::Discover {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(discover)? {
        let path = entry.map_err(discover)?.path();
        let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
            continue;
        };
        if path.is_file() && path.extension() == Some(SUITE_EXTENSION) {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(AppError::NoSuites {
            path: dir.to_path_buf(),
        });
    }
    files.sort();
    Ok(files)
}
