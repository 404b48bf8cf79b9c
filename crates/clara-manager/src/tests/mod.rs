//! Test suites for the manager daemon.

mod server_roundtrip;
pub(crate) mod support;
