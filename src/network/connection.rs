//! Client Connection
//!
//! One TCP connection to one broker or name server, shared by any number of
//! caller threads. A dedicated receive thread reads frames for the whole
//! lifetime of the socket and hands each response to the caller waiting on
//! its opaque.
//!
//! ## Lifecycle
//! ```text
//! Idle ──connect()──► Connected ──close() / I/O error──► Closed
//! ```
//! Closed is terminal. Recovery means dropping the connection and dialing a
//! new one, which is what `ConnectionPool` does.

use std::io::{BufReader, ErrorKind, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam::channel::{self, Receiver, Sender};
use crossbeam::select;
use parking_lot::Mutex;

use super::pending::{Delivery, ResponseTable};
use crate::config::Config;
use crate::error::{RemotingError, Result};
use crate::protocol::{self, Command};

/// A multiplexed connection to a single remote address
pub struct Connection {
    addr: String,
    config: Config,
    state: Mutex<State>,
    shared: Arc<Shared>,
}

enum State {
    Idle,
    Connected { receiver: JoinHandle<()> },
    Closed,
}

/// State touched by both caller threads and the receive thread
struct Shared {
    addr: String,
    connected: AtomicBool,

    /// Write half; the mutex keeps concurrent frames from interleaving
    writer: Mutex<Option<TcpStream>>,

    /// Handle used only to shut the socket down, never blocked on
    control: Mutex<Option<TcpStream>>,

    responses: ResponseTable,

    /// Dropped on close; every waiter selects on `closed`
    close_signal: Mutex<Option<Sender<()>>>,
    closed: Receiver<()>,
}

impl Shared {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Mark the connection dead and wake every waiter. Idempotent.
    fn mark_closed(&self) {
        self.connected.store(false, Ordering::Release);
        if let Some(socket) = self.control.lock().take() {
            let _ = socket.shutdown(Shutdown::Both);
        }
        self.close_signal.lock().take();
    }
}

impl Connection {
    /// Create an unconnected handle for `addr`
    pub fn new(addr: impl Into<String>, config: Config) -> Self {
        let addr = addr.into();
        let (close_signal, closed) = channel::bounded(0);

        Self {
            shared: Arc::new(Shared {
                addr: addr.clone(),
                connected: AtomicBool::new(false),
                writer: Mutex::new(None),
                control: Mutex::new(None),
                responses: ResponseTable::new(),
                close_signal: Mutex::new(Some(close_signal)),
                closed,
            }),
            addr,
            config,
            state: Mutex::new(State::Idle),
        }
    }

    /// Open the socket and start the receive thread
    ///
    /// No-op when already connected. Fails on a closed connection.
    pub fn connect(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            State::Connected { .. } => return Ok(()),
            State::Closed => return Err(RemotingError::NotConnected(self.addr.clone())),
            State::Idle => {}
        }

        let stream = dial(&self.addr, &self.config)?;
        let reader = stream.try_clone()?;
        let control = stream.try_clone()?;

        *self.shared.writer.lock() = Some(stream);
        *self.shared.control.lock() = Some(control);
        self.shared.connected.store(true, Ordering::Release);

        let shared = Arc::clone(&self.shared);
        let max_frame_size = self.config.max_frame_size;
        let spawned = thread::Builder::new()
            .name(format!("remoting-recv-{}", self.addr))
            .spawn(move || receive_loop(BufReader::new(reader), shared, max_frame_size));

        match spawned {
            Ok(receiver) => {
                *state = State::Connected { receiver };
                tracing::debug!("Connected to {}", self.addr);
                Ok(())
            }
            Err(e) => {
                self.shared.mark_closed();
                *state = State::Closed;
                Err(RemotingError::Io(e))
            }
        }
    }

    /// Send `request` and block until its response, the deadline, or the
    /// connection closing, whichever comes first
    ///
    /// On timeout the peer is not told; a late response is dropped when it
    /// arrives.
    pub fn invoke_sync(&self, request: &Command, deadline: Instant) -> Result<Command> {
        if !self.is_connected() {
            return Err(RemotingError::NotConnected(self.addr.clone()));
        }

        let opaque = request.opaque();
        let timeout = RemotingError::Timeout {
            addr: self.addr.clone(),
            opaque,
        };
        if Instant::now() >= deadline {
            return Err(timeout);
        }

        let pending = self.shared.responses.register(opaque);
        self.send(request)?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        select! {
            recv(pending.receiver()) -> response => {
                response.map_err(|_| RemotingError::ConnectionClosed(self.addr.clone()))
            }
            recv(self.shared.closed) -> _ => {
                // A response may have landed just before the socket died
                pending
                    .receiver()
                    .try_recv()
                    .map_err(|_| RemotingError::ConnectionClosed(self.addr.clone()))
            }
            default(remaining) => {
                tracing::debug!("Request {} to {} timed out", opaque, self.addr);
                Err(timeout)
            }
        }
    }

    /// Send `request` flagged one-way and return without waiting
    pub fn invoke_oneway(&self, request: &Command) -> Result<()> {
        if !self.is_connected() {
            return Err(RemotingError::NotConnected(self.addr.clone()));
        }

        let mut request = request.clone();
        request.mark_oneway();
        self.send(&request)
    }

    /// Stop the receive thread and release the socket. Idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        let previous = std::mem::replace(&mut *state, State::Closed);

        self.shared.mark_closed();
        self.shared.writer.lock().take();

        if let State::Connected { receiver } = previous {
            if receiver.join().is_err() {
                tracing::warn!("Receive thread for {} panicked", self.addr);
            }
            tracing::debug!("Closed connection to {}", self.addr);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of synchronous requests currently waiting for a response
    pub fn pending_requests(&self) -> usize {
        self.shared.responses.len()
    }

    /// Encode and write one frame; a failed write kills the connection
    fn send(&self, command: &Command) -> Result<()> {
        let frame = protocol::encode(command)?;

        let mut writer = self.shared.writer.lock();
        let Some(stream) = writer.as_mut() else {
            return Err(RemotingError::NotConnected(self.addr.clone()));
        };

        if let Err(e) = stream.write_all(&frame) {
            drop(writer);
            tracing::warn!("Write to {} failed: {}", self.addr, e);
            self.shared.mark_closed();
            return Err(RemotingError::Io(e));
        }

        tracing::trace!(
            "Sent code={} opaque={} ({} bytes) to {}",
            command.code(),
            command.opaque(),
            frame.len(),
            self.addr
        );
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("addr", &self.addr)
            .field("connected", &self.is_connected())
            .field("pending", &self.pending_requests())
            .finish()
    }
}

/// Resolve `addr` and connect to the first address that answers
fn dial(addr: &str, config: &Config) -> Result<TcpStream> {
    let connect_err = |source| RemotingError::Connect {
        addr: addr.to_string(),
        source,
    };

    let candidates = addr.to_socket_addrs().map_err(connect_err)?;

    let mut last_err = None;
    for candidate in candidates {
        match TcpStream::connect_timeout(&candidate, config.connect_timeout()) {
            Ok(stream) => {
                stream.set_nodelay(config.tcp_nodelay)?;
                stream.set_write_timeout(config.write_timeout())?;
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::InvalidInput, "address resolved to nothing")
    })))
}

/// Read frames until the socket fails, routing each response to its waiter
///
/// A zero-length frame, or one that is fully read but fails to decode, is
/// skipped; the stream is still aligned on the next length prefix. A declared
/// length above the ceiling means the prefix itself is garbage, so the
/// connection is dropped.
fn receive_loop(mut reader: BufReader<TcpStream>, shared: Arc<Shared>, max_frame_size: usize) {
    tracing::debug!("Receive loop started for {}", shared.addr);

    loop {
        let payload = match protocol::read_frame(&mut reader, max_frame_size) {
            Ok(payload) => payload,
            Err(RemotingError::Io(ref e)) if e.kind() == ErrorKind::UnexpectedEof => {
                tracing::debug!("Connection to {} closed by peer", shared.addr);
                break;
            }
            Err(e) => {
                if shared.is_connected() {
                    tracing::warn!("Receive loop for {} stopped: {}", shared.addr, e);
                }
                break;
            }
        };

        if payload.is_empty() {
            tracing::debug!("Skipping empty frame from {}", shared.addr);
            continue;
        }

        let response = match protocol::decode_bytes(payload) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Skipping undecodable frame from {}: {}", shared.addr, e);
                continue;
            }
        };

        let opaque = response.opaque();
        tracing::trace!(
            "Received code={} opaque={} from {}",
            response.code(),
            opaque,
            shared.addr
        );

        match shared.responses.complete(response) {
            Delivery::Delivered => {}
            Delivery::NoWaiter => {
                tracing::debug!("Dropping response {} from {}: no waiter", opaque, shared.addr);
            }
            Delivery::Duplicate => {
                tracing::debug!("Dropping duplicate response {} from {}", opaque, shared.addr);
            }
        }
    }

    shared.mark_closed();
}
