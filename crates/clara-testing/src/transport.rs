//! TCP connections to manager daemons.
//!
//! Every node is reached on the same port. Connections are opened with a
//! bounded timeout so an unreachable node fails the run instead of hanging
//! it.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use clara_protocol::{FrameError, FrameReader, decode_parts};

use crate::client::ClientError;

pub(crate) const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends one request line and waits for the decoded reply.
pub trait RequestChannel {
    /// Writes `message` as a request frame and reads the response parts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the frame cannot be sent, the peer closes
    /// the connection, or the reply is not a valid response frame.
    fn exchange(&mut self, message: &str) -> Result<Vec<String>, ClientError>;
}

/// A persistent connection to one manager daemon.
#[derive(Debug)]
pub struct TcpChannel {
    reader: FrameReader<TcpStream>,
}

impl TcpChannel {
    /// Connects to `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Resolve`] when the host has no usable address
    /// and [`ClientError::Connect`] when the connection is refused or times
    /// out.
    pub fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let endpoint = format!("tcp://{host}:{port}");
        let address = resolve_tcp_address(host, port).map_err(|source| ClientError::Resolve {
            endpoint: endpoint.clone(),
            source,
        })?;
        let stream = TcpStream::connect_timeout(&address, CONNECTION_TIMEOUT)
            .map_err(|source| ClientError::Connect { endpoint, source })?;
        Ok(Self::from_stream(stream))
    }

    /// Wraps an already connected stream.
    #[must_use]
    pub fn from_stream(stream: TcpStream) -> Self {
        Self {
            reader: FrameReader::new(stream),
        }
    }
}

impl RequestChannel for TcpChannel {
    fn exchange(&mut self, message: &str) -> Result<Vec<String>, ClientError> {
        if message.contains('\n') {
            return Err(ClientError::Frame(FrameError::malformed(message)));
        }
        let stream = self.reader.get_mut();
        stream
            .write_all(format!("{message}\n").as_bytes())
            .and_then(|()| stream.flush())
            .map_err(ClientError::Send)?;
        let line = self.reader.next_frame()?.ok_or(ClientError::Closed)?;
        Ok(decode_parts(&line)?)
    }
}

fn resolve_tcp_address(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::AddrNotAvailable, "no resolved addresses"))
}
