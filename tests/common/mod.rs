//! In-process stub peer for integration tests
//!
//! Listens on an ephemeral localhost port and runs a test-supplied handler
//! on its own thread for every accepted connection.

#![allow(dead_code)]

use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use rmq_remoting::protocol::{read_command, write_command};
use rmq_remoting::Command;

pub const MAX_FRAME: usize = 16 * 1024 * 1024;

pub const CLUSTER_INFO_BODY: &str = r#"{"brokerAddrTable":{}}"#;

pub struct StubPeer {
    addr: String,
    accepted: Arc<AtomicUsize>,
}

impl StubPeer {
    /// Start a peer running `handler` for each accepted socket
    pub fn spawn<F>(handler: F) -> Self
    where
        F: Fn(TcpStream) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let accepted = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(handler);

        let counter = Arc::clone(&accepted);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                counter.fetch_add(1, Ordering::SeqCst);
                let handler = Arc::clone(&handler);
                thread::spawn(move || handler(stream));
            }
        });

        Self { addr, accepted }
    }

    /// A peer answering every request with success and the cluster-info body
    pub fn echo() -> Self {
        Self::spawn(|mut stream| {
            while let Some(request) = read_request(&mut stream) {
                if request.is_oneway() {
                    continue;
                }
                let response = Command::response(0, request.opaque()).with_body(CLUSTER_INFO_BODY);
                if write_command(&mut stream, &response).is_err() {
                    break;
                }
            }
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of connections accepted so far
    pub fn accepted(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

/// Read the next request, `None` once the client hangs up
pub fn read_request(stream: &mut TcpStream) -> Option<Command> {
    read_command(stream, MAX_FRAME).ok()
}

/// An address nothing listens on
pub fn unused_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);
    addr
}
