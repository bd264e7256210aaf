//! Protocol-client abstraction.
//!
//! Wire framing, TLS, and binary parameter layout all live behind
//! [`ReaderConnection`]; the session controller only ever sees typed
//! commands, replies, and notifications. Methods return `impl Future +
//! Send` (desugared RPITIT) so generic sessions can be driven from spawned
//! Tokio tasks; implementations are free to write them as plain `async fn`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tagflow_core::Result;
use tagflow_llrp::{Command, Notification, Reply};
use tokio::sync::mpsc;

/// Result of the LLRP connection handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionAttemptStatus {
    Success,
    /// The reader already holds a reader-initiated connection.
    ReaderConnectionExists,
    /// The reader already holds another client's connection.
    ClientConnectionExists,
    /// A competing connection attempt preempted this one.
    AnotherConnectionAttempted,
    /// Refused for a reason other than an existing connection.
    Failed,
}

impl ConnectionAttemptStatus {
    /// Returns `true` if the handshake was accepted.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, ConnectionAttemptStatus::Success)
    }
}

impl fmt::Display for ConnectionAttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ConnectionAttemptStatus::Success => "Success",
            ConnectionAttemptStatus::ReaderConnectionExists => {
                "ReaderInitiatedConnectionAlreadyExists"
            }
            ConnectionAttemptStatus::ClientConnectionExists => {
                "ClientInitiatedConnectionAlreadyExists"
            }
            ConnectionAttemptStatus::AnotherConnectionAttempted => "AnotherConnectionAttempted",
            ConnectionAttemptStatus::Failed => "FailedReasonOtherThanAConnectionAlreadyExists",
        };
        write!(f, "{label}")
    }
}

/// A protocol client driving one reader.
///
/// # Contract
///
/// - [`open`](ReaderConnection::open) performs the transport/session
///   handshake and reports the reader's verdict; it does not retry.
/// - [`send`](ReaderConnection::send) issues exactly one command and blocks
///   up to `timeout` for the matching reply. A window that elapses with no
///   reply at all yields `Ok(Reply::empty())` — classification is the reply
///   checker's job, not the transport's. Transport-level failures are `Err`.
/// - [`subscribe`](ReaderConnection::subscribe) hands out the consolidated
///   asynchronous feed: keepalives, cycle-boundary events, and tag reports,
///   in arrival order. Called once per open.
/// - [`close`](ReaderConnection::close) releases the transport; it must be
///   safe to call on an already-closed connection.
pub trait ReaderConnection: Send + 'static {
    /// Perform the connection handshake.
    fn open(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<ConnectionAttemptStatus>> + Send;

    /// Issue one command and wait up to `timeout` for its reply.
    fn send(
        &mut self,
        command: Command,
        timeout: Duration,
    ) -> impl Future<Output = Result<Reply>> + Send;

    /// Close the transport.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to the asynchronous notification feed.
    fn subscribe(&mut self) -> mpsc::Receiver<Notification>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_attempt_status_success() {
        assert!(ConnectionAttemptStatus::Success.is_success());
        assert!(!ConnectionAttemptStatus::Failed.is_success());
        assert!(!ConnectionAttemptStatus::ClientConnectionExists.is_success());
    }

    #[test]
    fn test_connection_attempt_status_display() {
        assert_eq!(ConnectionAttemptStatus::Success.to_string(), "Success");
        assert_eq!(
            ConnectionAttemptStatus::AnotherConnectionAttempted.to_string(),
            "AnotherConnectionAttempted"
        );
    }
}
