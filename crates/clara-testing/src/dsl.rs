//! The action grammar used by acceptance suites.
//!
//! Three sentence shapes are understood, after `{{item}}` has been replaced
//! with the active item:
//!
//! - `(start|stop) [language] platform`, sent to the `platform` node;
//! - `(start|stop) language dpe on <node>`;
//! - `request [language] <words> [on <node>]`, where the words joined by
//!   `-` name a standard request.
//!
//! The language defaults to `java` and the node to `platform` wherever they
//! are optional.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use clara_protocol::{Action, RequestFrame, StandardRequest};

/// Placeholder replaced with the suite item before parsing.
pub const ITEM_PLACEHOLDER: &str = "{{item}}";

/// Language used when an action does not name one.
pub const DEFAULT_LANGUAGE: &str = "java";

/// Node addressed by platform actions and node-less requests.
pub const PLATFORM_NODE: &str = "platform";

static PLATFORM_ACTION: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(start|stop)\s+(?:(java|python|cpp)\s+)?platform\b")
});

static DPE_ACTION: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(start|stop)\s+(java|python|cpp)\s+dpe\s+on\s+(\w+)"));

static REQUEST_ACTION: Lazy<Regex> = Lazy::new(|| {
    compile(r"\brequest\s+(?:(java|python|cpp)\s+)?([a-z]+(?:\s+[a-z]+)*?)(?:\s+on\s+(\w+))?\s*$")
});

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("action grammar pattern must compile")
}

/// Failures raised while resolving an action sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The sentence matched none of the grammar shapes.
    #[error("Malformed action: \"{action}\"")]
    Malformed {
        /// The action after item substitution.
        action: String,
    },
    /// The request words do not name a standard request.
    #[error("Request not supported: \"{request}\"")]
    UnsupportedRequest {
        /// The request words joined with `-`.
        request: String,
    },
}

/// A resolved action: where to send it and what to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    /// Node the message is addressed to.
    pub node: String,
    /// Protocol message to send.
    pub frame: RequestFrame,
}

impl ParsedAction {
    /// The wire form of the message.
    #[must_use]
    pub fn message(&self) -> String {
        self.frame.to_string()
    }
}

/// Resolves `action` for the given suite `item`.
///
/// # Errors
///
/// Returns [`ActionError::Malformed`] when the sentence fits no shape and
/// [`ActionError::UnsupportedRequest`] for unknown request names.
///
/// # Examples
///
/// ```
/// use clara_testing::parse_action;
///
/// let parsed = parse_action("start {{item}} dpe on dpe1", "python").expect("valid action");
/// assert_eq!(parsed.node, "dpe1");
/// assert_eq!(parsed.message(), "clara:start:python:dpe");
/// ```
pub fn parse_action(action: &str, item: &str) -> Result<ParsedAction, ActionError> {
    let action = action.replace(ITEM_PLACEHOLDER, item);

    if let Some(captures) = PLATFORM_ACTION.captures(&action) {
        let language = captures.get(2).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
        return Ok(ParsedAction {
            node: PLATFORM_NODE.to_owned(),
            frame: RequestFrame::new(control_action(&captures[1]), language, "platform"),
        });
    }

    if let Some(captures) = DPE_ACTION.captures(&action) {
        return Ok(ParsedAction {
            node: captures[3].to_owned(),
            frame: RequestFrame::new(control_action(&captures[1]), &captures[2], "dpe"),
        });
    }

    if let Some(captures) = REQUEST_ACTION.captures(&action) {
        let language = captures.get(1).map_or(DEFAULT_LANGUAGE, |m| m.as_str());
        let request = captures[2].split_whitespace().collect::<Vec<_>>().join("-");
        let standard = StandardRequest::from_str(&request)
            .map_err(|_| ActionError::UnsupportedRequest { request })?;
        let node = captures.get(3).map_or(PLATFORM_NODE, |m| m.as_str());
        return Ok(ParsedAction {
            node: node.to_owned(),
            frame: RequestFrame::new(Action::Request, language, standard.to_string()),
        });
    }

    Err(ActionError::Malformed { action })
}

fn control_action(verb: &str) -> Action {
    if verb == "stop" {
        Action::Stop
    } else {
        Action::Start
    }
}
