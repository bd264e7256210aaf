//! Shared session state and the one-shot disconnect signal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tagflow_core::constants::{DEFAULT_ANTENNA_COUNT, DEFAULT_COMMAND_TIMEOUT, DEFAULT_LLRP_PORT};
use tagflow_core::Result;
use tagflow_llrp::{Command, Reply, check};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use crate::traits::ReaderConnection;

/// Connection lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
}

/// Configuration for one reader session.
///
/// Defaults mirror the fixed deployment values: LLRP port 5084 and a
/// 3000 ms command window.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Reader host address.
    pub host: String,

    /// Reader LLRP port.
    pub port: u16,

    /// Window for each command/response exchange.
    pub command_timeout: Duration,
}

impl ReaderOptions {
    /// Options for the given host with default port and timeout.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_LLRP_PORT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self::new("127.0.0.1")
    }
}

/// Mutable session state plus exclusive ownership of the protocol client.
///
/// One `tokio::sync::Mutex<SessionInner>` serializes every access from the
/// command path, the watchdog ticks, and the notification dispatcher. The
/// reading flag and the connection live under the same lock: flag checks
/// and the commands they gate always happen inside one critical section.
pub(crate) struct SessionInner<C> {
    pub connection: C,
    pub state: SessionState,
    /// Antenna count reported by the reader; assumed until discovery.
    pub antenna_count: u16,
    /// Stamp of the most recent keepalive receipt.
    pub last_keepalive: Instant,
    /// True iff an Add/Enable/Start sequence completed and no teardown has
    /// begun since.
    pub reading: bool,
    pub command_timeout: Duration,
}

impl<C: ReaderConnection> SessionInner<C> {
    pub fn new(connection: C, command_timeout: Duration) -> Self {
        Self {
            connection,
            state: SessionState::default(),
            antenna_count: DEFAULT_ANTENNA_COUNT,
            last_keepalive: Instant::now(),
            reading: false,
            command_timeout,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Issue one command and run its reply through the checker.
    pub async fn send_checked(&mut self, command: Command) -> Result<Reply> {
        trace!(command = command.name(), "issuing command");
        let reply = self
            .connection
            .send(command, self.command_timeout)
            .await?;
        check(&reply)?;
        Ok(reply)
    }
}

/// Edge-triggered connection-lost signal, fired at most once per session.
///
/// Cloned handles share the same underlying signal. [`wait`] unblocks every
/// waiter exactly once, including waiters that subscribe after the fire.
///
/// [`wait`]: DisconnectSignal::wait
#[derive(Debug, Clone)]
pub struct DisconnectSignal {
    fired: Arc<AtomicBool>,
    tx: Arc<watch::Sender<bool>>,
}

impl DisconnectSignal {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            fired: Arc::new(AtomicBool::new(false)),
            tx: Arc::new(tx),
        }
    }

    /// Fire the signal. Returns `true` on the first call only.
    pub(crate) fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        let _ = self.tx.send(true);
        true
    }

    /// Whether the signal has already fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Wait until the signal fires; returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives inside self, so wait_for cannot fail.
        let _ = rx.wait_for(|lost| *lost).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_options_defaults() {
        let options = ReaderOptions::new("192.168.0.30");
        assert_eq!(options.host, "192.168.0.30");
        assert_eq!(options.port, DEFAULT_LLRP_PORT);
        assert_eq!(options.command_timeout, DEFAULT_COMMAND_TIMEOUT);
    }

    #[tokio::test]
    async fn test_disconnect_signal_fires_once() {
        let signal = DisconnectSignal::new();
        assert!(!signal.is_fired());

        assert!(signal.fire());
        assert!(!signal.fire());
        assert!(signal.is_fired());
    }

    #[tokio::test]
    async fn test_disconnect_signal_unblocks_waiters() {
        let signal = DisconnectSignal::new();

        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };

        signal.fire();
        waiter.await.unwrap();

        // A waiter arriving after the fire returns immediately.
        signal.wait().await;
    }
}
