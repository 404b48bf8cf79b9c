//! Multi-node client for manager daemons.

use std::collections::BTreeMap;
use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use clara_protocol::{FrameError, Status};

use crate::transport::{RequestChannel, TcpChannel};

const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");

/// Failures raised while talking to a manager daemon.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No connection is configured under the node name.
    #[error("Bad node: \"{node}\"")]
    BadNode {
        /// The requested node name.
        node: String,
    },
    /// The request message was empty.
    #[error("Empty message")]
    EmptyMessage,
    /// The daemon replied with no parts at all.
    #[error("Empty response")]
    EmptyResponse,
    /// The daemon replied with a status but no payload.
    #[error("Bad response: \"{parts:?}\"")]
    BadResponse {
        /// The parts received.
        parts: Vec<String>,
    },
    /// The daemon reported an error without a message.
    #[error("Empty error")]
    EmptyError,
    /// The daemon reported an error.
    #[error("{message}")]
    Remote {
        /// Error payload joined with newlines.
        message: String,
    },
    /// The first part was not a known status.
    #[error("Bad status: \"{status}\"")]
    BadStatus {
        /// The unrecognised status.
        status: String,
    },
    /// The node address did not resolve.
    #[error("failed to resolve daemon address {endpoint}: {source}")]
    Resolve {
        /// Endpoint being resolved.
        endpoint: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The connection could not be established.
    #[error("failed to connect to daemon at {endpoint}: {source}")]
    Connect {
        /// Endpoint being dialled.
        endpoint: String,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Writing the request failed.
    #[error("failed to send request to daemon: {0}")]
    Send(#[source] io::Error),
    /// The daemon closed the connection before replying.
    #[error("daemon closed the connection without replying")]
    Closed,
    /// The reply could not be read or decoded.
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Sends protocol messages to named nodes.
pub trait Requester {
    /// Sends `message` to `node` and returns the validated payload.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] for unknown nodes, empty messages, transport
    /// failures and any response [`validate_response`] rejects.
    fn request(&mut self, node: &str, message: &str) -> Result<Vec<String>, ClientError>;

    /// Sends `message` to every node, discarding individual results.
    fn request_all(&mut self, message: &str);
}

/// One persistent connection per configured node.
#[derive(Debug)]
pub struct DaemonClient<C = TcpChannel> {
    channels: BTreeMap<String, C>,
}

impl DaemonClient<TcpChannel> {
    /// Connects eagerly to every node in `nodes` on `port`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ClientError::Resolve`] or
    /// [`ClientError::Connect`] encountered.
    pub fn connect(nodes: &BTreeMap<String, String>, port: u16) -> Result<Self, ClientError> {
        let channels = nodes
            .iter()
            .map(|(name, host)| {
                debug!(target: CLIENT_TARGET, node = %name, host = %host, port, "connecting");
                TcpChannel::connect(host, port).map(|channel| (name.clone(), channel))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { channels })
    }
}

impl<C: RequestChannel> DaemonClient<C> {
    /// Builds a client over pre-established channels.
    #[must_use]
    pub fn from_channels(channels: BTreeMap<String, C>) -> Self {
        Self { channels }
    }

    /// Names of the configured nodes, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}

impl<C: RequestChannel> Requester for DaemonClient<C> {
    fn request(&mut self, node: &str, message: &str) -> Result<Vec<String>, ClientError> {
        let channel = self
            .channels
            .get_mut(node)
            .ok_or_else(|| ClientError::BadNode {
                node: node.to_owned(),
            })?;
        if message.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        debug!(target: CLIENT_TARGET, node, message, "sending request");
        validate_response(channel.exchange(message)?)
    }

    fn request_all(&mut self, message: &str) {
        for (node, channel) in &mut self.channels {
            let outcome = channel.exchange(message).and_then(validate_response);
            if let Err(error) = outcome {
                warn!(target: CLIENT_TARGET, node = %node, message, %error, "broadcast request failed");
            }
        }
    }
}

/// Checks a multipart reply and extracts its payload.
///
/// # Errors
///
/// Returns [`ClientError::EmptyResponse`], [`ClientError::BadResponse`],
/// [`ClientError::EmptyError`], [`ClientError::Remote`] or
/// [`ClientError::BadStatus`].
///
/// # Examples
///
/// ```
/// use clara_testing::validate_response;
///
/// let payload = validate_response(vec!["SUCCESS".into(), "".into()]).expect("success");
/// assert_eq!(payload, vec![String::new()]);
/// ```
pub fn validate_response(parts: Vec<String>) -> Result<Vec<String>, ClientError> {
    if parts.is_empty() {
        return Err(ClientError::EmptyResponse);
    }
    if parts.len() < 2 {
        return Err(ClientError::BadResponse { parts });
    }
    let mut parts = parts.into_iter();
    let status = parts.next().unwrap_or_default();
    let payload: Vec<String> = parts.collect();
    match status.parse::<Status>() {
        Ok(Status::Success) => Ok(payload),
        Ok(Status::Error) if payload.iter().all(String::is_empty) => Err(ClientError::EmptyError),
        Ok(Status::Error) => Err(ClientError::Remote {
            message: payload.join("\n"),
        }),
        Err(_) => Err(ClientError::BadStatus { status }),
    }
}
