use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    default_listen_endpoint, default_node_port, default_start_probe, default_stop_probe,
};
use crate::endpoint::Endpoint;

/// Bounded polling schedule: up to `attempts` probes, `interval_ms` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RetryPolicy {
    /// Number of probes before giving up.
    pub attempts: u32,
    /// Delay between probes in milliseconds.
    pub interval_ms: u64,
}

impl RetryPolicy {
    /// Builds a policy.
    #[must_use]
    pub const fn new(attempts: u32, interval_ms: u64) -> Self {
        Self {
            attempts,
            interval_ms,
        }
    }

    /// Delay between probes.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// The `daemon` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Endpoint the manager daemon binds.
    pub listen: Endpoint,
    /// Port clients dial on every node.
    pub port: u16,
    /// Schedule used to confirm a freshly spawned child stays up.
    pub start_probe: RetryPolicy,
    /// Schedule used to wait for a terminated child before killing it.
    pub stop_probe: RetryPolicy,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            port: default_node_port(),
            start_probe: default_start_probe(),
            stop_probe: default_stop_probe(),
        }
    }
}
