//! # rmq-remoting
//!
//! Remoting transport for administering a RocketMQ cluster:
//! - Binary framing of request/response commands with a JSON header
//! - Correlation of responses to callers by opaque id
//! - One multiplexed TCP connection per address with a receive thread
//! - Address-keyed connection pooling
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Administrative callers                      │
//! │            invoke(addr, cmd, deadline) / oneway              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   RemotingClient                             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                  ConnectionPool                              │
//! │            (RwLock<addr → Arc<Connection>>)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │   writer    │          │  receive thread  │
//!   │  (Mutex)    │          │ opaque → waiter  │
//!   └─────────────┘          └──────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RemotingError, Result};
pub use config::Config;
pub use client::RemotingClient;
pub use network::{Connection, ConnectionPool};
pub use protocol::{Command, OpaqueGenerator, RequestCode, ResponseCode};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of rmq-remoting
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
