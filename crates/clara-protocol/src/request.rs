//! Request frames sent from clients to the manager daemon.

use std::fmt;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::FrameError;

/// Literal tag that prefixes every request.
pub const PROTOCOL_TAG: &str = "clara";

/// Wildcard accepted by `stop` in either argument position.
pub const ALL: &str = "all";

/// Operations understood by the manager daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Launch a supervised process.
    Start,
    /// Terminate a supervised process, or all of them.
    Stop,
    /// Run a one-shot orchestrator request.
    Request,
}

/// A validated `clara:<action>:<first>:<second>` request.
///
/// The meaning of the two arguments depends on the action: `start` and
/// `stop` take a language and an instance, `request` takes a language and a
/// standard request name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFrame {
    action: Action,
    first: String,
    second: String,
}

impl RequestFrame {
    /// Builds a frame from its parts without touching the wire format.
    ///
    /// # Examples
    ///
    /// ```
    /// use clara_protocol::{Action, RequestFrame};
    ///
    /// let frame = RequestFrame::new(Action::Request, "java", "list-dpes");
    /// assert_eq!(frame.to_string(), "clara:request:java:list-dpes");
    /// ```
    pub fn new(action: Action, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            action,
            first: first.into(),
            second: second.into(),
        }
    }

    /// The broadcast teardown request `clara:stop:all:all`.
    #[must_use]
    pub fn stop_all() -> Self {
        Self::new(Action::Stop, ALL, ALL)
    }

    /// Parses a request line received from a client.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptyRequest`] for an empty line,
    /// [`FrameError::MalformedRequest`] when the line does not split into
    /// exactly four colon-separated fields led by [`PROTOCOL_TAG`], and
    /// [`FrameError::UnsupportedAction`] for unknown actions.
    pub fn parse(message: &str) -> Result<Self, FrameError> {
        if message.is_empty() {
            return Err(FrameError::EmptyRequest);
        }
        let fields: Vec<&str> = message.split(':').collect();
        let [tag, action, first, second] = fields.as_slice() else {
            return Err(FrameError::malformed(message));
        };
        if *tag != PROTOCOL_TAG {
            return Err(FrameError::malformed(message));
        }
        let parsed = Action::from_str(action).map_err(|_| FrameError::UnsupportedAction {
            action: (*action).to_owned(),
        })?;
        Ok(Self::new(parsed, *first, *second))
    }

    /// The requested operation.
    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    /// The first argument, normally a language name or [`ALL`].
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// The second argument: an instance, a request name, or [`ALL`].
    #[must_use]
    pub fn second(&self) -> &str {
        &self.second
    }

    /// Whether either argument is the [`ALL`] wildcard.
    #[must_use]
    pub fn targets_all(&self) -> bool {
        self.first == ALL || self.second == ALL
    }
}

impl fmt::Display for RequestFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{PROTOCOL_TAG}:{}:{}:{}",
            self.action, self.first, self.second
        )
    }
}

impl FromStr for RequestFrame {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
