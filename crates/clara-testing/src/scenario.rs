//! A single acceptance test: ordered actions and the expected final result.

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::client::{ClientError, Requester};
use crate::dsl::{ActionError, parse_action};

const SUITE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::suite");

/// One entry of a suite's `tests` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TestCase {
    /// Action sentences, run in order.
    pub actions: Option<Vec<String>>,
    /// Payload expected from the last action.
    pub result: Option<Vec<String>>,
}

/// Reasons an acceptance test fails.
#[derive(Debug, Error)]
pub enum TestError {
    /// The test lists no actions.
    #[error("The test has no actions")]
    NoActions,
    /// The test has no expected result.
    #[error("The test has no result")]
    NoResult,
    /// An action sentence could not be resolved.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// A request failed.
    #[error(transparent)]
    Client(#[from] ClientError),
    /// The last response differed from the expected result.
    #[error("Wrong result: \"{actual:?}\". Expected: \"{expected:?}\"")]
    WrongResult {
        /// Payload of the last response.
        actual: Vec<String>,
        /// Expected payload.
        expected: Vec<String>,
    },
}

/// A test case bound to the suite item it runs for.
#[derive(Debug, Clone, Copy)]
pub struct AcceptanceTest<'a> {
    case: &'a TestCase,
    item: &'a str,
}

impl<'a> AcceptanceTest<'a> {
    /// Binds `case` to `item`.
    #[must_use]
    pub const fn new(case: &'a TestCase, item: &'a str) -> Self {
        Self { case, item }
    }

    /// Runs every action in order and compares the last response.
    ///
    /// Intermediate responses are discarded; the first failing action stops
    /// the test.
    ///
    /// # Errors
    ///
    /// Returns [`TestError`] when the case is incomplete, an action fails or
    /// the final payload does not match.
    pub fn run(&self, client: &mut dyn Requester) -> Result<Vec<String>, TestError> {
        let actions = self
            .case
            .actions
            .as_deref()
            .filter(|actions| !actions.is_empty())
            .ok_or(TestError::NoActions)?;
        let expected = self
            .case
            .result
            .as_deref()
            .filter(|result| !result.is_empty())
            .ok_or(TestError::NoResult)?;

        let mut last = Vec::new();
        for action in actions {
            info!(target: SUITE_TARGET, item = self.item, "Request '{action}'");
            let parsed = parse_action(action, self.item)?;
            last = client.request(&parsed.node, &parsed.message())?;
        }

        if last == expected {
            info!(target: SUITE_TARGET, item = self.item, "Result {last:?}");
            Ok(last)
        } else {
            Err(TestError::WrongResult {
                actual: last,
                expected: expected.to_vec(),
            })
        }
    }
}
