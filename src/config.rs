//! Configuration for the remoting layer
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{RemotingError, Result};

/// Default ceiling for a single frame (16 MB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Transport configuration shared by every connection of a pool
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Connection Configuration
    // -------------------------------------------------------------------------
    /// Timeout for establishing a TCP connection (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block indefinitely)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm on new sockets
    pub tcp_nodelay: bool,

    // -------------------------------------------------------------------------
    // Request Configuration
    // -------------------------------------------------------------------------
    /// Deadline applied by `RemotingClient::invoke_with_default_timeout`
    /// (milliseconds)
    pub request_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// Largest frame the receive loop accepts before declaring the
    /// stream corrupt (bytes, excluding the 4-byte length prefix)
    pub max_frame_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 3000,
            write_timeout_ms: 3000,
            tcp_nodelay: true,
            request_timeout_ms: 3000,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the values can drive a connection
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_ms == 0 {
            return Err(RemotingError::Config(
                "connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.max_frame_size == 0 {
            return Err(RemotingError::Config(
                "max_frame_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// `None` when writes may block indefinitely
    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_ms > 0).then(|| Duration::from_millis(self.write_timeout_ms))
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds, 0 disables it)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.config.tcp_nodelay = enabled;
        self
    }

    /// Set the default request timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    /// Set the maximum accepted frame size (in bytes)
    pub fn max_frame_size(mut self, size: usize) -> Self {
        self.config.max_frame_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_frame_size, 16 * 1024 * 1024);
        assert_eq!(config.connect_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_zero_write_timeout_disables_it() {
        let config = Config::builder().write_timeout_ms(0).build();
        assert_eq!(config.write_timeout(), None);
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let config = Config::builder().connect_timeout_ms(0).build();
        assert!(matches!(config.validate(), Err(RemotingError::Config(_))));
    }
}
