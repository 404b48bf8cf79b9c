//! Connection handling abstraction for the daemon listener.

use std::net::TcpStream;

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a single connection until the peer disconnects. Implementations
    /// should avoid panicking.
    fn handle(&self, stream: TcpStream);
}
