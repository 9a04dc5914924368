//! Error types for the rigctld client

use rigctl_protocol::{ParseError, ProtocolError, RigError};
use thiserror::Error;

/// Errors that can occur while talking to the daemon
#[derive(Debug, Error)]
pub enum ClientError {
    /// Failed to connect to the daemon
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection attempt exceeded the configured timeout
    #[error("connection to {addr} timed out after {timeout_ms}ms")]
    ConnectTimeout { addr: String, timeout_ms: u64 },

    /// I/O error on an established connection
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Protocol error (daemon status, malformed reply, missing report)
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    /// The daemon-reported error, if this is one
    pub fn rig_error(&self) -> Option<RigError> {
        match self {
            ClientError::Protocol(ProtocolError::Rig(err)) => Some(*err),
            _ => None,
        }
    }
}

impl From<RigError> for ClientError {
    fn from(err: RigError) -> Self {
        ClientError::Protocol(err.into())
    }
}

impl From<ParseError> for ClientError {
    fn from(err: ParseError) -> Self {
        ClientError::Protocol(err.into())
    }
}

/// Result alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
