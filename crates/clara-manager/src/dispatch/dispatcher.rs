//! Maps request frames onto supervisor operations.

use tracing::{debug, info, warn};

use clara_protocol::{Action, RequestFrame, Response};

use crate::supervisor::{CapturedOutput, Supervisor, SupervisorError};

use super::{DISPATCH_TARGET, DispatchError};

/// Answers control requests against a [`Supervisor`].
///
/// Every request yields exactly one [`Response`]; failures never escape as
/// panics or errors.
pub struct Dispatcher {
    supervisor: Supervisor,
}

impl Dispatcher {
    /// Wraps a supervisor.
    #[must_use]
    pub fn new(supervisor: Supervisor) -> Self {
        Self { supervisor }
    }

    /// Parses and executes one request line.
    pub fn dispatch(&mut self, message: &str) -> Response {
        debug!(target: DISPATCH_TARGET, message, "request received");
        let response = self.try_dispatch(message).unwrap_or_else(|error| {
            warn!(target: DISPATCH_TARGET, message, %error, "request failed");
            Response::error(&error.to_string())
        });
        info!(
            target: DISPATCH_TARGET,
            message,
            status = %response.status(),
            "request answered"
        );
        response
    }

    /// Stops every supervised process; used when the daemon exits.
    pub fn shutdown(&mut self) {
        self.supervisor.stop_all();
    }

    /// The supervisor behind this dispatcher.
    #[must_use]
    pub fn supervisor(&self) -> &Supervisor {
        &self.supervisor
    }

    fn try_dispatch(&mut self, message: &str) -> Result<Response, DispatchError> {
        let frame = RequestFrame::parse(message)?;
        match frame.action() {
            Action::Start => {
                self.supervisor.start(frame.first(), frame.second())?;
                Ok(Response::ok())
            }
            Action::Stop if frame.targets_all() => {
                self.supervisor.stop_all();
                Ok(Response::ok())
            }
            Action::Stop => match self.supervisor.stop(frame.first(), frame.second()) {
                Ok(()) => Ok(Response::ok()),
                Err(SupervisorError::ForcedKill { key }) => {
                    warn!(target: DISPATCH_TARGET, %key, "stop completed by killing the process");
                    Ok(Response::ok())
                }
                Err(error) => Err(error.into()),
            },
            Action::Request => {
                let output = self
                    .supervisor
                    .run_standard_request(frame.first(), frame.second())?;
                Ok(render_output(output))
            }
        }
    }
}

/// `SUCCESS` with stdout on a clean exit, otherwise `ERROR` with stdout
/// followed by stderr.
fn render_output(output: CapturedOutput) -> Response {
    if output.succeeded() {
        return Response::success(output.stdout);
    }
    let CapturedOutput {
        mut stdout, stderr, ..
    } = output;
    stdout.extend(stderr);
    Response::failure(stdout)
}
