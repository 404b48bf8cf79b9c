//! Test helpers for the transport layer.

use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Mutex};

use super::ConnectionHandler;

/// Handler that records the peer of every connection and hangs up.
#[derive(Default)]
pub(crate) struct PeerRecorder {
    peers: Mutex<Vec<SocketAddr>>,
}

impl PeerRecorder {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn peers(&self) -> Vec<SocketAddr> {
        self.peers.lock().map(|peers| peers.clone()).unwrap_or_default()
    }
}

impl ConnectionHandler for PeerRecorder {
    fn handle(&self, stream: TcpStream) {
        if let (Ok(peer), Ok(mut peers)) = (stream.peer_addr(), self.peers.lock()) {
            peers.push(peer);
        }
    }
}
