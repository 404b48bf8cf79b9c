//! Wire types shared by the CLARA manager daemon and its clients.
//!
//! Requests are single text lines of the form
//! `clara:<action>:<first>:<second>` and responses are multipart frames whose
//! first part is a [`Status`]. Both sides of the control channel build and
//! validate messages through the types in this crate so the framing rules
//! live in one place.
//!
//! # Example
//!
//! ```
//! use clara_protocol::{Action, RequestFrame, Response};
//!
//! let frame = RequestFrame::parse("clara:start:python:dpe").expect("valid frame");
//! assert_eq!(frame.action(), Action::Start);
//! assert_eq!(frame.to_string(), "clara:start:python:dpe");
//!
//! let reply = Response::ok();
//! assert_eq!(reply.into_parts(), vec!["SUCCESS", ""]);
//! ```

mod codec;
mod errors;
mod request;
mod response;
mod standard;

pub use codec::{FrameReader, MAX_FRAME_BYTES, decode_parts, encode_parts};
pub use errors::FrameError;
pub use request::{ALL, Action, PROTOCOL_TAG, RequestFrame};
pub use response::{Response, Status};
pub use standard::StandardRequest;

/// TCP port the manager daemon listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 7788;

#[cfg(test)]
mod tests;
