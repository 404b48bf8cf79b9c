//! Errors raised while parsing or framing control-channel messages.

use std::io;

use thiserror::Error;

/// Failures produced by request parsing and line framing.
///
/// The display strings of the request variants are part of the wire
/// protocol: the daemon relays them verbatim inside `ERROR` responses.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The request line was empty.
    #[error("Empty request")]
    EmptyRequest,
    /// The request did not have exactly four fields or carried a foreign tag.
    #[error("Bad request: \"{message}\"")]
    MalformedRequest {
        /// The request exactly as received.
        message: String,
    },
    /// The action field named an operation the daemon does not implement.
    #[error("Unsupported action: {action}")]
    UnsupportedAction {
        /// The unrecognised action.
        action: String,
    },
    /// A single frame exceeded [`crate::MAX_FRAME_BYTES`].
    #[error("frame of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Number of bytes read before giving up.
        size: usize,
        /// Configured limit.
        limit: usize,
    },
    /// A frame was not valid UTF-8.
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    /// A response line could not be encoded or decoded as a JSON array.
    #[error("invalid response frame: {source}")]
    Json {
        /// Underlying serialisation error.
        #[from]
        source: serde_json::Error,
    },
    /// Reading from the underlying stream failed.
    #[error("failed to read frame: {source}")]
    Io {
        /// Underlying IO error.
        #[from]
        source: io::Error,
    },
}

impl FrameError {
    /// Builds a [`FrameError::MalformedRequest`] for the given message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }
}
