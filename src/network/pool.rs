//! Connection Pool
//!
//! Caches one `Connection` per remote address. Lookups of a healthy entry
//! only take the read lock; dialing happens under the write lock after a
//! second look, so two callers racing on a new address dial it once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::Connection;
use crate::config::Config;
use crate::error::{RemotingError, Result};

/// Address-keyed cache of live connections
pub struct ConnectionPool {
    config: Config,
    connections: RwLock<HashMap<String, Arc<Connection>>>,
    closed: AtomicBool,
}

impl ConnectionPool {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            connections: RwLock::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Return the connection for `addr`, dialing a new one if the cached
    /// entry is missing or dead
    pub fn get_or_create(&self, addr: &str) -> Result<Arc<Connection>> {
        if self.is_closed() {
            return Err(RemotingError::PoolClosed);
        }

        if let Some(connection) = self.connections.read().get(addr) {
            if connection.is_connected() {
                return Ok(Arc::clone(connection));
            }
        }

        let mut connections = self.connections.write();

        // Re-check: another caller may have dialed while we waited
        if self.is_closed() {
            return Err(RemotingError::PoolClosed);
        }
        if let Some(connection) = connections.get(addr) {
            if connection.is_connected() {
                return Ok(Arc::clone(connection));
            }
        }

        if let Some(stale) = connections.remove(addr) {
            tracing::debug!("Replacing dead connection to {}", addr);
            stale.close();
        }

        let connection = Arc::new(Connection::new(addr, self.config.clone()));
        connection.connect()?;
        connections.insert(addr.to_string(), Arc::clone(&connection));

        Ok(connection)
    }

    /// Close and forget the connection for `addr`
    ///
    /// Returns whether an entry existed.
    pub fn remove(&self, addr: &str) -> bool {
        let removed = self.connections.write().remove(addr);
        match removed {
            Some(connection) => {
                tracing::debug!("Evicting connection to {}", addr);
                connection.close();
                true
            }
            None => false,
        }
    }

    /// Close every connection and refuse further dials
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);

        let drained: Vec<_> = self.connections.write().drain().collect();
        for (addr, connection) in drained {
            tracing::debug!("Closing connection to {}", addr);
            connection.close();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.connections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.read().is_empty()
    }

    /// Addresses with a cached entry, healthy or not
    pub fn addresses(&self) -> Vec<String> {
        self.connections.read().keys().cloned().collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        self.close();
    }
}
