use camino::Utf8PathBuf;

use clara_protocol::DEFAULT_PORT;

use crate::daemon::RetryPolicy;
use crate::endpoint::Endpoint;
use crate::logging::LogFormat;

/// Configuration file read when no path is supplied.
pub const DEFAULT_CONFIG_PATH: &str = "default-config.yaml";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Directory holding suite files, relative to the configuration file.
pub const DEFAULT_TESTS_DIR: &str = "tests";

/// Address the daemon binds when none is configured.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub fn default_daemon_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default logging format for the acceptance runner.
pub fn default_runner_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default listening endpoint for the daemon.
pub fn default_listen_endpoint() -> Endpoint {
    Endpoint::tcp(DEFAULT_LISTEN_HOST, DEFAULT_PORT)
}

/// Port clients use to reach each node.
pub fn default_node_port() -> u16 {
    DEFAULT_PORT
}

/// Five probes 400ms apart: a child surviving two seconds counts as started.
pub fn default_start_probe() -> RetryPolicy {
    RetryPolicy::new(5, 400)
}

/// Twenty-five probes 200ms apart before escalating to a kill.
pub fn default_stop_probe() -> RetryPolicy {
    RetryPolicy::new(25, 200)
}

/// Default suite directory.
pub fn default_tests_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_TESTS_DIR)
}
