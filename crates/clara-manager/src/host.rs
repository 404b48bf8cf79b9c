//! Resolution of the address embedded in log file names.

use std::net::{SocketAddr, ToSocketAddrs};

const FALLBACK_HOST_IP: &str = "127.0.0.1";

/// Returns `configured` when set, otherwise the first IPv4 address the local
/// host name resolves to, otherwise the loopback address.
pub(crate) fn resolve_host_ip(configured: Option<&str>) -> String {
    configured
        .filter(|ip| !ip.trim().is_empty())
        .map_or_else(local_ipv4, str::to_owned)
}

fn local_ipv4() -> String {
    let hostname = gethostname::gethostname();
    let name = hostname.to_string_lossy();
    (name.as_ref(), 0)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.find(SocketAddr::is_ipv4))
        .map_or_else(|| FALLBACK_HOST_IP.to_owned(), |addr| addr.ip().to_string())
}
