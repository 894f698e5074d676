//! Network Module
//!
//! TCP transport to brokers and name servers.
//!
//! ## Architecture
//! - One receive thread per connection
//! - Callers block on a one-shot slot keyed by the request's opaque
//! - Connections cached per address by the pool

mod connection;
mod pending;
mod pool;

pub use connection::Connection;
pub use pool::ConnectionPool;
