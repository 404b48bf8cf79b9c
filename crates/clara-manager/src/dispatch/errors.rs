//! Error mapping for dispatch failures.

use thiserror::Error;

use clara_protocol::FrameError;

use crate::supervisor::SupervisorError;

/// Failures turned into `ERROR` responses.
///
/// The display string is the response payload: request and domain errors
/// read exactly as the operator should see them, everything else is
/// prefixed as unexpected.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request line itself was rejected.
    #[error(transparent)]
    Request(#[from] FrameError),
    /// The supervisor refused the operation for an expected reason.
    #[error(transparent)]
    Domain(SupervisorError),
    /// The supervisor hit an internal fault.
    #[error("Unexpected exception: {0}")]
    Unexpected(SupervisorError),
}

impl From<SupervisorError> for DispatchError {
    fn from(error: SupervisorError) -> Self {
        if error.is_domain() {
            Self::Domain(error)
        } else {
            Self::Unexpected(error)
        }
    }
}
