//! Remoting Client
//!
//! The surface the administrative layer calls: one synchronous `invoke` and
//! a fire-and-forget `invoke_oneway` against an address, plus the pool's
//! lifecycle.
//!
//! ## Responsibilities
//! - Resolve an address to a pooled connection
//! - Hand the request to that connection
//!
//! Nothing here retries. When `invoke` fails the caller decides whether to
//! `remove` the address and try again, here or elsewhere.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, ConnectionPool};
use crate::protocol::Command;

/// Entry point for sending commands to brokers and name servers
pub struct RemotingClient {
    pool: ConnectionPool,
}

impl RemotingClient {
    /// Create a client; no connection is opened until the first request
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            pool: ConnectionPool::new(config),
        })
    }

    /// Send `request` to `addr` and wait for its response until `deadline`
    ///
    /// A response with a nonzero code is returned as `Ok`; its status is
    /// for the caller to interpret. Retry with a freshly built request, never
    /// the same one: see
    /// [`crate::RemotingError::is_connection_fatal`].
    pub fn invoke(&self, addr: &str, request: &Command, deadline: Instant) -> Result<Command> {
        let connection = self.pool.get_or_create(addr)?;
        connection.invoke_sync(request, deadline).map_err(|e| {
            tracing::debug!(
                "Request code={} opaque={} to {} failed: {}",
                request.code(),
                request.opaque(),
                addr,
                e
            );
            e
        })
    }

    /// `invoke` with a deadline `timeout` from now
    pub fn invoke_timeout(
        &self,
        addr: &str,
        request: &Command,
        timeout: Duration,
    ) -> Result<Command> {
        self.invoke(addr, request, Instant::now() + timeout)
    }

    /// `invoke` with the configured request timeout
    pub fn invoke_with_default_timeout(&self, addr: &str, request: &Command) -> Result<Command> {
        self.invoke_timeout(addr, request, self.pool.config().request_timeout())
    }

    /// Send `request` to `addr` without waiting for any response
    pub fn invoke_oneway(&self, addr: &str, request: &Command) -> Result<()> {
        let connection = self.pool.get_or_create(addr)?;
        connection.invoke_oneway(request)
    }

    /// Pooled connection for `addr`, dialed on first use
    pub fn get_or_create(&self, addr: &str) -> Result<Arc<Connection>> {
        self.pool.get_or_create(addr)
    }

    /// Drop the pooled connection for `addr` so the next call dials fresh
    pub fn remove(&self, addr: &str) -> bool {
        self.pool.remove(addr)
    }

    /// Close every pooled connection; later calls fail with `PoolClosed`
    pub fn close(&self) {
        self.pool.close();
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }
}
