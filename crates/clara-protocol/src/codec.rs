//! Line framing for the control channel.
//!
//! Requests travel as a single UTF-8 line. Responses travel as a single line
//! holding a JSON array of strings. Both directions are newline terminated
//! and bounded by [`MAX_FRAME_BYTES`].

use std::io::{self, BufRead, BufReader, Read};

use crate::FrameError;

/// Largest frame accepted in either direction, newline included.
pub const MAX_FRAME_BYTES: usize = 64 * 1024;

/// Reads newline-terminated frames from a byte stream.
///
/// The reader keeps its buffer between calls, so one connection can carry
/// any number of sequential frames.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: BufReader<R>,
    limit: usize,
}

impl<R: Read> FrameReader<R> {
    /// Wraps `reader` with the default frame limit.
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, MAX_FRAME_BYTES)
    }

    /// Wraps `reader` with a custom frame limit.
    pub fn with_limit(reader: R, limit: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            limit,
        }
    }

    /// Reads the next frame with its line terminator stripped.
    ///
    /// Returns `Ok(None)` once the peer closes the stream without sending
    /// further data. A trailing unterminated line is still returned.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooLarge`] when a frame exceeds the limit,
    /// [`FrameError::InvalidUtf8`] for undecodable bytes and
    /// [`FrameError::Io`] when the stream fails.
    pub fn next_frame(&mut self) -> Result<Option<String>, FrameError> {
        let mut buffer = Vec::new();
        let budget = u64::try_from(self.limit.saturating_add(1)).unwrap_or(u64::MAX);
        let read = read_with_retry(&mut self.inner, budget, &mut buffer)?;
        if read == 0 {
            return Ok(None);
        }
        if buffer.len() > self.limit {
            return Err(FrameError::TooLarge {
                size: buffer.len(),
                limit: self.limit,
            });
        }
        let mut line = String::from_utf8(buffer).map_err(|_| FrameError::InvalidUtf8)?;
        trim_terminator(&mut line);
        Ok(Some(line))
    }

    /// Borrows the wrapped reader, for example to write a reply.
    pub fn get_mut(&mut self) -> &mut R {
        self.inner.get_mut()
    }
}

fn read_with_retry<R: Read>(
    reader: &mut BufReader<R>,
    budget: u64,
    buffer: &mut Vec<u8>,
) -> io::Result<usize> {
    loop {
        match reader.by_ref().take(budget).read_until(b'\n', buffer) {
            Ok(read) => return Ok(read),
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => return Err(error),
        }
    }
}

fn trim_terminator(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}

/// Encodes response parts as one JSON line, terminator included.
///
/// # Errors
///
/// Returns [`FrameError::Json`] if serialisation fails.
pub fn encode_parts(parts: &[String]) -> Result<String, FrameError> {
    let mut line = serde_json::to_string(parts)?;
    line.push('\n');
    Ok(line)
}

/// Decodes a response line into its raw parts.
///
/// No status validation happens here; callers decide how to treat missing
/// or unknown statuses.
///
/// # Errors
///
/// Returns [`FrameError::Json`] when the line is not a JSON array of
/// strings.
pub fn decode_parts(line: &str) -> Result<Vec<String>, FrameError> {
    Ok(serde_json::from_str(line)?)
}
