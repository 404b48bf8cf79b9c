//! Request parsing, dispatch and the serial request loop.
//!
//! Connection threads decode request lines and forward them over a channel
//! to one dispatch thread, which owns the [`Dispatcher`] and therefore the
//! process table. Requests are answered strictly one at a time.

mod connection;
mod dispatcher;
mod errors;
mod worker;
#[cfg(test)]
mod tests;

pub(crate) use connection::DispatchConnectionHandler;
pub use dispatcher::Dispatcher;
pub use errors::DispatchError;
pub(crate) use worker::{DispatchWorker, JobSender};

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
