//! Named one-shot requests forwarded to a language's orchestrator helper.

use strum::{Display, EnumString};

/// Standard requests the orchestrator helper knows how to answer.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
///
/// use clara_protocol::StandardRequest;
///
/// let request = StandardRequest::from_str("list-dpes").expect("known request");
/// assert_eq!(request, StandardRequest::ListDpes);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum StandardRequest {
    /// List the DPEs registered with the platform.
    ListDpes,
}
