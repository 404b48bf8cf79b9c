//! Connection handler that feeds request lines to the dispatch worker.

use std::io::Write;
use std::net::TcpStream;

use tracing::{debug, warn};

use clara_protocol::{FrameError, FrameReader, Response, encode_parts};

use crate::transport::ConnectionHandler;

use super::{DISPATCH_TARGET, JobSender};

/// Serves sequential request/response pairs on one connection.
pub(crate) struct DispatchConnectionHandler {
    jobs: JobSender,
}

impl DispatchConnectionHandler {
    pub(crate) fn new(jobs: JobSender) -> Self {
        Self { jobs }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: TcpStream) {
        let mut reader = FrameReader::new(stream);
        loop {
            let response = match reader.next_frame() {
                Ok(Some(message)) => match self.jobs.submit(message) {
                    Some(response) => response,
                    None => {
                        debug!(target: DISPATCH_TARGET, "dispatcher stopped, closing connection");
                        return;
                    }
                },
                Ok(None) => {
                    debug!(target: DISPATCH_TARGET, "client disconnected");
                    return;
                }
                Err(error) => {
                    warn!(target: DISPATCH_TARGET, %error, "failed to read request");
                    let rejection = Response::error(&error.to_string());
                    if let Err(write_error) = write_response(reader.get_mut(), rejection) {
                        debug!(target: DISPATCH_TARGET, error = %write_error, "rejection not delivered");
                    }
                    return;
                }
            };
            if let Err(error) = write_response(reader.get_mut(), response) {
                warn!(target: DISPATCH_TARGET, %error, "failed to write response");
                return;
            }
        }
    }
}

fn write_response(stream: &mut TcpStream, response: Response) -> Result<(), FrameError> {
    let line = encode_parts(&response.into_parts())?;
    stream.write_all(line.as_bytes())?;
    stream.flush()?;
    Ok(())
}
