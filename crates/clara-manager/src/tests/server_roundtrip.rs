//! Round trips over a real TCP connection to a served dispatcher.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream};

use rstest::{fixture, rstest};

use clara_config::Endpoint;
use clara_protocol::{MAX_FRAME_BYTES, decode_parts};

use crate::server::{RunningServer, Server};

use super::support::Harness;

struct Served {
    harness: Harness,
    addr: SocketAddr,
    running: RunningServer,
}

#[fixture]
fn served() -> Served {
    let harness = Harness::new();
    let server = Server::bind(&Endpoint::tcp("127.0.0.1", 0), harness.dispatcher())
        .expect("bind server");
    let addr = server.local_addr().expect("local address");
    let running = server.start().expect("start server");
    Served {
        harness,
        addr,
        running,
    }
}

struct Client {
    writer: TcpStream,
    reader: BufReader<TcpStream>,
}

impl Client {
    fn connect(addr: SocketAddr) -> Self {
        let writer = TcpStream::connect(addr).expect("connect");
        let reader = BufReader::new(writer.try_clone().expect("clone stream"));
        Self { writer, reader }
    }

    fn send_raw(&mut self, bytes: &[u8]) -> Option<Vec<String>> {
        self.writer.write_all(bytes).expect("write request");
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).expect("read response");
        (read > 0).then(|| decode_parts(line.trim_end()).expect("decode response"))
    }

    fn request(&mut self, message: &str) -> Vec<String> {
        self.send_raw(format!("{message}\n").as_bytes())
            .expect("server replied")
    }
}

#[rstest]
fn one_connection_carries_sequential_requests(served: Served) {
    let mut client = Client::connect(served.addr);

    assert_eq!(client.request("clara:start:java:platform"), vec!["SUCCESS", ""]);
    assert_eq!(
        client.request("clara:start:java:platform"),
        vec!["ERROR", "java/platform already running!"]
    );
    assert_eq!(client.request(""), vec!["ERROR", "Empty request"]);

    served.running.shutdown().expect("shutdown");
}

#[rstest]
fn clients_share_one_process_table(served: Served) {
    let mut first = Client::connect(served.addr);
    let mut second = Client::connect(served.addr);

    assert_eq!(first.request("clara:start:python:dpe"), vec!["SUCCESS", ""]);
    assert_eq!(
        second.request("clara:start:python:dpe"),
        vec!["ERROR", "python/dpe already running!"]
    );
    assert_eq!(second.request("clara:stop:python:dpe"), vec!["SUCCESS", ""]);

    served.running.shutdown().expect("shutdown");
}

#[rstest]
fn shutdown_stops_remaining_processes(served: Served) {
    let mut client = Client::connect(served.addr);
    client.request("clara:start:java:dpe");

    served.running.shutdown().expect("shutdown");

    assert_eq!(
        served.harness.system.events(),
        vec![String::from("terminate java-dpe")]
    );
}

#[rstest]
fn oversized_requests_are_rejected(served: Served) {
    let mut client = Client::connect(served.addr);
    let payload = vec![b'x'; MAX_FRAME_BYTES + 1];

    let reply = client.send_raw(&payload).expect("rejection sent");

    assert_eq!(reply[0], "ERROR");
    served.running.shutdown().expect("shutdown");
}
