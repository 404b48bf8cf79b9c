use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::defaults::default_log_filter_string;

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;

/// The `logging` section of the configuration file.
///
/// The format is optional because each binary picks its own default.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter expression.
    pub filter: String,
    /// Output format, when pinned by the file.
    pub format: Option<LogFormat>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter_string(),
            format: None,
        }
    }
}
