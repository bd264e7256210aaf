//! Keepalive watchdog.
//!
//! The reader emits a keepalive on a fixed period once configured; the
//! watchdog ticks on its own timer, independent of protocol traffic, and
//! declares the session dead after a silence threshold. The threshold is
//! twice the keepalive send period so ordinary jitter or a single lost
//! message never trips it.

use std::sync::Arc;

use tagflow_core::constants::{KEEPALIVE_TIMEOUT, WATCHDOG_TICK};
use tokio::sync::Mutex;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::session::{DisconnectSignal, SessionInner};
use crate::traits::ReaderConnection;

/// Periodic liveness monitor for one session.
///
/// Armed on open, disarmed on close; both operations are idempotent. On
/// expiry the tick loop exits before firing, so the signal can never be
/// raised twice from here — and [`DisconnectSignal`] is one-shot besides.
pub(crate) struct KeepaliveWatchdog {
    cancel: Option<CancellationToken>,
}

impl KeepaliveWatchdog {
    pub fn new() -> Self {
        Self { cancel: None }
    }

    #[allow(dead_code)]
    pub fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }

    /// Start ticking. A second start while armed is a no-op.
    pub fn start<C: ReaderConnection>(
        &mut self,
        shared: Arc<Mutex<SessionInner<C>>>,
        signal: DisconnectSignal,
    ) {
        if self.cancel.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        debug!("keepalive watchdog armed");

        tokio::spawn(async move {
            let mut tick = time::interval_at(time::Instant::now() + WATCHDOG_TICK, WATCHDOG_TICK);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tick.tick() => {
                        let elapsed = shared.lock().await.last_keepalive.elapsed();
                        if elapsed >= KEEPALIVE_TIMEOUT {
                            warn!(
                                silent_ms = elapsed.as_millis() as u64,
                                "keepalive silence threshold reached, session lost"
                            );
                            signal.fire();
                            break;
                        }
                    }
                }
            }
        });
    }

    /// Stop ticking. Safe to call when not armed.
    pub fn stop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
            debug!("keepalive watchdog disarmed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockReaderConnection;
    use std::time::Duration;
    use tagflow_core::constants::DEFAULT_COMMAND_TIMEOUT;
    use tokio::time::Instant;

    fn shared_session() -> Arc<Mutex<SessionInner<MockReaderConnection>>> {
        let (connection, _handle) = MockReaderConnection::new();
        Arc::new(Mutex::new(SessionInner::new(
            connection,
            DEFAULT_COMMAND_TIMEOUT,
        )))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_silence_threshold() {
        let shared = shared_session();
        let signal = DisconnectSignal::new();
        let mut watchdog = KeepaliveWatchdog::new();
        watchdog.start(Arc::clone(&shared), signal.clone());

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(!signal.is_fired());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(signal.is_fired());

        // Long silence afterwards produces no second fire.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(signal.is_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_keepalives_keep_session_alive() {
        let shared = shared_session();
        let signal = DisconnectSignal::new();
        let mut watchdog = KeepaliveWatchdog::new();
        watchdog.start(Arc::clone(&shared), signal.clone());

        // Receipts every 15s, each below the 30s threshold.
        for _ in 0..8 {
            tokio::time::sleep(Duration::from_secs(15)).await;
            shared.lock().await.last_keepalive = Instant::now();
        }

        assert!(!signal.is_fired());
        watchdog.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_prevents_fire() {
        let shared = shared_session();
        let signal = DisconnectSignal::new();
        let mut watchdog = KeepaliveWatchdog::new();
        watchdog.start(Arc::clone(&shared), signal.clone());

        tokio::time::sleep(Duration::from_secs(10)).await;
        watchdog.stop();
        assert!(!watchdog.is_armed());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!signal.is_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let shared = shared_session();
        let signal = DisconnectSignal::new();
        let mut watchdog = KeepaliveWatchdog::new();

        watchdog.start(Arc::clone(&shared), signal.clone());
        watchdog.start(Arc::clone(&shared), signal.clone());
        assert!(watchdog.is_armed());

        watchdog.stop();
        watchdog.stop();
        assert!(!watchdog.is_armed());
    }
}
