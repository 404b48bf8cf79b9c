//! Multipart responses returned by the manager daemon.

use strum::{Display, EnumString};

/// Leading part of every response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// The request completed; the payload carries its output.
    Success,
    /// The request failed; the payload carries the error message by line.
    Error,
}

/// A status followed by an ordered payload of text lines.
///
/// The payload always holds at least one line so every frame on the wire
/// has two or more parts; an empty payload is normalised to a single empty
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    lines: Vec<String>,
}

impl Response {
    /// The plain acknowledgement `["SUCCESS", ""]`.
    #[must_use]
    pub fn ok() -> Self {
        Self::success(Vec::new())
    }

    /// A successful response carrying the given lines.
    #[must_use]
    pub fn success(lines: Vec<String>) -> Self {
        Self::with_lines(Status::Success, lines)
    }

    /// A failed response carrying the given lines verbatim.
    #[must_use]
    pub fn failure(lines: Vec<String>) -> Self {
        Self::with_lines(Status::Error, lines)
    }

    /// A failed response whose payload is `message` split by line.
    ///
    /// # Examples
    ///
    /// ```
    /// use clara_protocol::Response;
    ///
    /// let reply = Response::error("first\nsecond");
    /// assert_eq!(reply.into_parts(), vec!["ERROR", "first", "second"]);
    /// ```
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self::failure(message.lines().map(str::to_owned).collect())
    }

    fn with_lines(status: Status, mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { status, lines }
    }

    /// The response status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The payload lines following the status.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Flattens the response into its wire parts, status first.
    #[must_use]
    pub fn into_parts(self) -> Vec<String> {
        let mut parts = Vec::with_capacity(self.lines.len() + 1);
        parts.push(self.status.to_string());
        parts.extend(self.lines);
        parts
    }
}
