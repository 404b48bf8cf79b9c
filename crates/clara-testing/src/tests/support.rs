//! Shared doubles: a scripted requester and a one-connection fake daemon.

use std::collections::{BTreeMap, VecDeque};
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::client::{ClientError, Requester};

/// Replies from a script keyed by message and records every call.
#[derive(Debug, Default)]
pub(crate) struct ScriptedRequester {
    replies: BTreeMap<String, VecDeque<Result<Vec<String>, String>>>,
    pub(crate) requests: Vec<(String, String)>,
    pub(crate) broadcasts: Vec<String>,
}

impl ScriptedRequester {
    /// Queues the payload returned the next time `message` is sent.
    pub(crate) fn reply(&mut self, message: &str, payload: &[&str]) {
        self.queue(
            message,
            Ok(payload.iter().map(|line| (*line).to_owned()).collect()),
        );
    }

    /// Queues a remote error for the next time `message` is sent.
    pub(crate) fn fail(&mut self, message: &str, error: &str) {
        self.queue(message, Err(error.to_owned()));
    }

    fn queue(&mut self, message: &str, reply: Result<Vec<String>, String>) {
        self.replies
            .entry(message.to_owned())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn messages(&self) -> Vec<&str> {
        self.requests
            .iter()
            .map(|(_, message)| message.as_str())
            .collect()
    }
}

impl Requester for ScriptedRequester {
    fn request(&mut self, node: &str, message: &str) -> Result<Vec<String>, ClientError> {
        self.requests.push((node.to_owned(), message.to_owned()));
        let reply = self
            .replies
            .get_mut(message)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(vec![String::new()]));
        reply.map_err(|message| ClientError::Remote { message })
    }

    fn request_all(&mut self, message: &str) {
        self.broadcasts.push(message.to_owned());
    }
}

/// A daemon stand-in that answers one connection with canned lines.
pub(crate) struct FakeDaemon {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeDaemon {
    /// Serves one connection, replying to the n-th request with the n-th
    /// raw line. The connection closes once the lines run out.
    pub(crate) fn start(lines: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake daemon");
        let addr = listener.local_addr().expect("fake daemon address");
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);
        let handle = thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            for line in lines {
                let mut request = String::new();
                if reader.read_line(&mut request).unwrap_or(0) == 0 {
                    return;
                }
                log.lock()
                    .expect("request log lock")
                    .push(request.trim_end().to_owned());
                if stream.write_all(format!("{line}\n").as_bytes()).is_err() {
                    return;
                }
            }
        });
        Self {
            addr,
            received,
            handle: Some(handle),
        }
    }

    pub(crate) fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Waits for the daemon thread and returns the requests it saw.
    pub(crate) fn finish(mut self) -> Vec<String> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("fake daemon thread");
        }
        self.received.lock().expect("request log lock").clone()
    }
}
