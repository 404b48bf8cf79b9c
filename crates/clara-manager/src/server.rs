//! Public entry point for serving the control channel.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use clara_config::Endpoint;

use crate::dispatch::{DISPATCH_TARGET, DispatchConnectionHandler, DispatchWorker, Dispatcher};
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Errors raised while starting or stopping a [`Server`].
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener failed.
    #[error(transparent)]
    Listener(#[from] ListenerError),
    /// The dispatch thread could not be started.
    #[error("failed to spawn dispatch worker: {source}")]
    Worker {
        #[source]
        source: io::Error,
    },
    /// The dispatch thread panicked.
    #[error("dispatch worker panicked")]
    WorkerPanic,
}

/// A bound but not yet serving control endpoint.
pub struct Server {
    listener: SocketListener,
    dispatcher: Dispatcher,
}

impl Server {
    /// Binds `endpoint`; requests will be answered by `dispatcher`.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Listener`] when the address cannot be resolved
    /// or bound.
    pub fn bind(endpoint: &Endpoint, dispatcher: Dispatcher) -> Result<Self, ServerError> {
        Ok(Self {
            listener: SocketListener::bind(endpoint)?,
            dispatcher,
        })
    }

    /// The bound address, useful when binding port zero.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr()
    }

    /// Starts the dispatch worker and the accept loop.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if either thread cannot be started.
    pub fn start(self) -> Result<RunningServer, ServerError> {
        let worker = DispatchWorker::spawn(self.dispatcher)
            .map_err(|source| ServerError::Worker { source })?;
        let handler = Arc::new(DispatchConnectionHandler::new(worker.sender()));
        match self.listener.start(handler) {
            Ok(listener) => Ok(RunningServer { listener, worker }),
            Err(error) => {
                if worker.finish().is_err() {
                    warn!(target: DISPATCH_TARGET, "dispatch worker panicked during abort");
                }
                Err(error.into())
            }
        }
    }
}

/// A serving control endpoint.
pub struct RunningServer {
    listener: ListenerHandle,
    worker: DispatchWorker,
}

impl RunningServer {
    /// Stops accepting connections, then stops every supervised process and
    /// joins the dispatch thread.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] if either thread panicked.
    pub fn shutdown(self) -> Result<(), ServerError> {
        let Self { listener, worker } = self;
        listener.shutdown();
        let listener_result = listener.join();
        let worker_result = worker.finish().map_err(|_| ServerError::WorkerPanic);
        listener_result?;
        worker_result
    }
}
