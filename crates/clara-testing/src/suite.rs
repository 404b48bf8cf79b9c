//! Suite files: a list of tests replayed once per item.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use clara_protocol::RequestFrame;

use crate::client::Requester;
use crate::dsl::DEFAULT_LANGUAGE;
use crate::scenario::{AcceptanceTest, TestCase};

const SUITE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::suite");

/// Failures raised while loading a suite file.
#[derive(Debug, Error)]
pub enum SuiteError {
    /// The file could not be read.
    #[error("failed to read suite '{path}': {source}")]
    Read {
        /// Suite file path.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file was not a valid suite document.
    #[error("failed to parse suite '{path}': {message}")]
    Parse {
        /// Suite file path.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SuiteDocument {
    name: Option<String>,
    with: Option<Vec<String>>,
    tests: Option<Vec<TestCase>>,
}

/// Outcome of one suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteReport {
    /// Whether every pass of every item succeeded.
    pub passed: bool,
    /// Suite name.
    pub name: String,
}

impl SuiteReport {
    /// A failed report for `name`.
    #[must_use]
    pub fn failed(name: impl Into<String>) -> Self {
        Self {
            passed: false,
            name: name.into(),
        }
    }
}

/// A loaded suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    name: String,
    items: Vec<String>,
    tests: Vec<TestCase>,
}

impl TestSuite {
    /// Reads the suite at `path`. The file stem names the suite unless the
    /// document sets `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteError::Read`] or [`SuiteError::Parse`].
    pub fn load(path: &Utf8Path) -> Result<Self, SuiteError> {
        let text = fs::read_to_string(path).map_err(|source| SuiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text, suite_stem(path)).map_err(|message| SuiteError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses a suite document, naming it `default_name` unless it sets
    /// `name`. An absent or empty `with` list runs the tests for `java`.
    ///
    /// # Errors
    ///
    /// Returns the parser diagnostic as text.
    pub fn from_yaml(text: &str, default_name: &str) -> Result<Self, String> {
        let document: SuiteDocument = if text.trim().is_empty() {
            SuiteDocument::default()
        } else {
            serde_saphyr::from_str(text).map_err(|error| error.to_string())?
        };
        let items = document
            .with
            .filter(|items| !items.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_LANGUAGE.to_owned()]);
        Ok(Self {
            name: document.name.unwrap_or_else(|| default_name.to_owned()),
            items,
            tests: document.tests.unwrap_or_default(),
        })
    }

    /// Suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items the tests are replayed for.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of tests in the suite.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Whether the suite has no tests.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Runs every test once per item, then stops everything on every node.
    ///
    /// Within one item the first failing test ends that item's pass. A
    /// suite without tests fails at once and sends nothing.
    pub fn run(&self, client: &mut dyn Requester) -> SuiteReport {
        if self.tests.is_empty() {
            error!(target: SUITE_TARGET, suite = %self.name, "Missing tests");
            return SuiteReport::failed(&self.name);
        }

        info!(target: SUITE_TARGET, suite = %self.name, "Running {}", self.name);
        let mut passed = true;
        for item in &self.items {
            passed &= self.run_item(client, item);
        }
        client.request_all(&RequestFrame::stop_all().to_string());

        if passed {
            info!(target: SUITE_TARGET, suite = %self.name, "suite passed");
        } else {
            error!(target: SUITE_TARGET, suite = %self.name, "suite failed");
        }
        SuiteReport {
            passed,
            name: self.name.clone(),
        }
    }

    fn run_item(&self, client: &mut dyn Requester, item: &str) -> bool {
        for (index, case) in self.tests.iter().enumerate() {
            if let Err(failure) = AcceptanceTest::new(case, item).run(client) {
                error!(
                    target: SUITE_TARGET,
                    suite = %self.name,
                    item,
                    test = index + 1,
                    "{failure}"
                );
                return false;
            }
        }
        true
    }
}

/// File stem of `path`, used when a suite has no `name`.
#[must_use]
pub fn suite_stem(path: &Utf8Path) -> &str {
    path.file_stem().unwrap_or(path.as_str())
}
