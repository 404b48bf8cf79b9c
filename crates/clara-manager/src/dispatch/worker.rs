//! The single thread that owns the dispatcher.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use clara_protocol::Response;

use super::{DISPATCH_TARGET, Dispatcher};

enum Job {
    Request {
        message: String,
        reply: Sender<Response>,
    },
    Shutdown,
}

/// Cloneable entry point used by connection threads.
#[derive(Clone)]
pub(crate) struct JobSender {
    jobs: Sender<Job>,
}

impl JobSender {
    /// Queues `message` and blocks until it has been answered.
    ///
    /// Returns `None` once the worker has stopped.
    pub(crate) fn submit(&self, message: String) -> Option<Response> {
        let (reply, response) = mpsc::channel();
        self.jobs.send(Job::Request { message, reply }).ok()?;
        response.recv().ok()
    }
}

/// Handle to the dispatch thread.
pub(crate) struct DispatchWorker {
    jobs: Sender<Job>,
    handle: JoinHandle<()>,
}

impl DispatchWorker {
    pub(crate) fn spawn(dispatcher: Dispatcher) -> io::Result<Self> {
        let (jobs, queue) = mpsc::channel();
        let handle = thread::Builder::new()
            .name(String::from("clara-dispatch"))
            .spawn(move || run_worker(dispatcher, &queue))?;
        Ok(Self { jobs, handle })
    }

    pub(crate) fn sender(&self) -> JobSender {
        JobSender {
            jobs: self.jobs.clone(),
        }
    }

    /// Stops accepting work, stops every supervised process and joins the
    /// thread. Requests still queued are dropped unanswered.
    pub(crate) fn finish(self) -> thread::Result<()> {
        if self.jobs.send(Job::Shutdown).is_err() {
            debug!(target: DISPATCH_TARGET, "dispatch worker already stopped");
        }
        self.handle.join()
    }
}

fn run_worker(mut dispatcher: Dispatcher, queue: &Receiver<Job>) {
    for job in queue {
        match job {
            Job::Request { message, reply } => {
                let response = dispatcher.dispatch(&message);
                if reply.send(response).is_err() {
                    debug!(target: DISPATCH_TARGET, "client left before the reply was sent");
                }
            }
            Job::Shutdown => break,
        }
    }
    info!(target: DISPATCH_TARGET, "dispatch worker stopping, cleaning up processes");
    dispatcher.shutdown();
}
