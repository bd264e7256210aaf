//! Error types for reader-session operations.
//!
//! Every LLRP command reply passes through one validation choke point
//! ([`tagflow-llrp`]'s reply checker), which maps failures onto this
//! taxonomy. There is no retry machinery anywhere in the stack: callers
//! decide whether an error propagates or is swallowed at a teardown
//! boundary.

use crate::types::StatusCode;

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors that can occur while driving a reader session.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The LLRP handshake was refused or the transport could not connect.
    #[error("Connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    /// No reply at all (neither response nor error message) arrived within
    /// the command window.
    #[error("No reply from reader within the command window")]
    Timeout,

    /// The reader answered with an explicit non-success status.
    #[error("Reader rejected command: {code}: {description}")]
    Protocol {
        code: StatusCode,
        description: String,
    },

    /// A reply arrived but exposed no status on either the response or the
    /// error object — an unrecognized message shape.
    #[error("Malformed reply: {message}")]
    Internal { message: String },

    /// A value was rejected locally, before any command was sent.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// A command was issued on a session that is not connected.
    #[error("Reader is not connected")]
    NotConnected,

    /// Transport-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReaderError {
    /// Create a new connection error.
    pub fn connection(host: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Connection {
            host: host.into(),
            reason: reason.into(),
        }
    }

    /// Create a new protocol error from a non-success status.
    pub fn protocol(code: StatusCode, description: impl Into<String>) -> Self {
        Self::Protocol {
            code,
            description: description.into(),
        }
    }

    /// Create a new internal (malformed reply) error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let error = ReaderError::connection("192.168.0.30", "handshake refused");
        assert_eq!(
            error.to_string(),
            "Connection to 192.168.0.30 failed: handshake refused"
        );
    }

    #[test]
    fn test_protocol_error_display() {
        let error = ReaderError::protocol(StatusCode::FieldError, "bad duration");
        assert!(matches!(error, ReaderError::Protocol { .. }));
        assert!(error.to_string().contains("bad duration"));
    }

    #[test]
    fn test_timeout_error_display() {
        let error = ReaderError::Timeout;
        assert_eq!(
            error.to_string(),
            "No reply from reader within the command window"
        );
    }
}
