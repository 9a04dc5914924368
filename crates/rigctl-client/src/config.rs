//! Client connection settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default rigctld listen address
pub const DEFAULT_ADDRESS: &str = "localhost:4532";

/// Settings for connecting to a daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Daemon address as `host:port`
    pub address: String,
    /// Disable Nagle's algorithm on the TCP socket
    pub nodelay: bool,
    /// Give up connecting after this many milliseconds (no limit if unset)
    pub connect_timeout_ms: Option<u64>,
}

impl ClientConfig {
    /// Settings for the given address with all other fields defaulted
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Connect timeout as a [`Duration`]
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            nodelay: true,
            connect_timeout_ms: None,
        }
    }
}
