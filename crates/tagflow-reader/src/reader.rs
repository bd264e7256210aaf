//! Connection lifecycle orchestration.
//!
//! [`UhfReader`] owns the session: it opens and configures the reader,
//! arms the keepalive watchdog, runs the notification dispatcher that
//! feeds the watchdog and the inventory cycle controller, and tears
//! everything down idempotently. [`run_inventory_session`] is the scoped
//! entry point that guarantees teardown on every exit path.
//!
//! # Connection Lifecycle
//!
//! 1. `open()` — handshake, subscribe, configure, arm watchdog
//! 2. `start()` — arm and start the inventory plan
//! 3. notifications flow until the watchdog declares the session lost
//! 4. `stop()` — tear the plan down (best-effort)
//! 5. `close()` — disarm, best-effort reader reset, release transport

use std::sync::Arc;

use tagflow_core::{ReaderError, Result, TagReportRecord};
use tagflow_llrp::Notification;
use tokio::sync::{Mutex, mpsc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::configurator;
use crate::decoder;
use crate::inventory;
use crate::session::{DisconnectSignal, ReaderOptions, SessionInner, SessionState};
use crate::traits::ReaderConnection;
use crate::watchdog::KeepaliveWatchdog;

/// Capacity of the outbound tag-record channel.
const RECORD_CHANNEL_CAPACITY: usize = 256;

/// Session controller for one fixed-position UHF reader.
///
/// Not `Clone`: exactly one owner drives the lifecycle. The watchdog and
/// the notification dispatcher run as background tasks sharing the session
/// mutex, so every state access stays serialized.
pub struct UhfReader<C: ReaderConnection> {
    options: ReaderOptions,
    inner: Arc<Mutex<SessionInner<C>>>,
    watchdog: KeepaliveWatchdog,
    dispatcher: Option<CancellationToken>,
    disconnect: DisconnectSignal,
    records_tx: mpsc::Sender<TagReportRecord>,
}

impl<C: ReaderConnection> UhfReader<C> {
    /// Create a session around a protocol connection.
    ///
    /// Returns the reader plus the receiving end of the tag-record stream;
    /// one record per observation, in arrival order.
    pub fn new(options: ReaderOptions, connection: C) -> (Self, mpsc::Receiver<TagReportRecord>) {
        let (records_tx, records_rx) = mpsc::channel(RECORD_CHANNEL_CAPACITY);
        (
            Self::with_record_sink(options, connection, records_tx),
            records_rx,
        )
    }

    /// Like [`UhfReader::new`] with a caller-provided record sink.
    pub fn with_record_sink(
        options: ReaderOptions,
        connection: C,
        records_tx: mpsc::Sender<TagReportRecord>,
    ) -> Self {
        let inner = SessionInner::new(connection, options.command_timeout);
        Self {
            options,
            inner: Arc::new(Mutex::new(inner)),
            watchdog: KeepaliveWatchdog::new(),
            dispatcher: None,
            disconnect: DisconnectSignal::new(),
            records_tx,
        }
    }

    /// Whether the session is currently connected.
    pub async fn is_connected(&self) -> bool {
        self.inner.lock().await.is_connected()
    }

    /// Whether the inventory cycle is currently running.
    pub async fn is_reading(&self) -> bool {
        self.inner.lock().await.reading
    }

    /// Antenna count in effect for inventory plans.
    pub async fn antenna_count(&self) -> u16 {
        self.inner.lock().await.antenna_count
    }

    /// Handle to the one-shot connection-lost signal.
    #[must_use]
    pub fn disconnect_signal(&self) -> DisconnectSignal {
        self.disconnect.clone()
    }

    /// Wait until the watchdog declares the session lost.
    pub async fn wait_disconnected(&self) {
        self.disconnect.wait().await;
    }

    /// Open the session. Idempotent: a no-op while already connected.
    ///
    /// Handshake, notification subscription, synchronous configuration,
    /// then the watchdog. A configuration failure backs the whole open out:
    /// the transport is closed again, the session stays `Disconnected`, and
    /// the error propagates.
    ///
    /// # Errors
    /// `ReaderError::Connection` when the transport or handshake fails; any
    /// configuration-sequence error otherwise.
    pub async fn open(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.is_connected() {
            return Ok(());
        }

        info!(host = %self.options.host, port = self.options.port, "connecting to reader");
        let timeout = self.options.command_timeout;
        let status = match inner.connection.open(timeout).await {
            Ok(status) => status,
            Err(err) => {
                return Err(ReaderError::connection(&self.options.host, err.to_string()));
            }
        };
        if !status.is_success() {
            return Err(ReaderError::connection(&self.options.host, status.to_string()));
        }

        let notifications = inner.connection.subscribe();
        inner.last_keepalive = Instant::now();
        inner.state = SessionState::Connected;

        if let Err(err) = configurator::configure(&mut inner).await {
            error!(%err, "reader configuration failed, backing out of open");
            if let Err(close_err) = inner.connection.close().await {
                warn!(error = %close_err, "transport close failed during aborted open");
            }
            inner.state = SessionState::Disconnected;
            return Err(err);
        }
        drop(inner);

        self.spawn_dispatcher(notifications);
        self.watchdog
            .start(Arc::clone(&self.inner), self.disconnect.clone());
        info!(host = %self.options.host, "reader session established");
        Ok(())
    }

    /// Close the session. Idempotent: a no-op while not connected.
    ///
    /// The watchdog stops first so teardown latency cannot be mistaken for
    /// a dead session. The factory reset and extension handshake that
    /// follow are best-effort: failures are logged and discarded, the
    /// transport is released regardless, and session state is cleared.
    pub async fn close(&mut self) {
        let mut inner = self.inner.lock().await;
        if !inner.is_connected() {
            return;
        }

        self.watchdog.stop();
        if let Some(cancel) = self.dispatcher.take() {
            cancel.cancel();
        }

        if let Err(err) = configurator::reset_to_defaults(&mut inner).await {
            warn!(%err, "best-effort reader reset failed during close");
        }
        if let Err(err) = inner.connection.close().await {
            warn!(%err, "transport close failed");
        }

        inner.state = SessionState::Disconnected;
        inner.reading = false;
        info!(host = %self.options.host, "reader session closed");
    }

    /// Begin continuous inventory. No-op while already reading.
    ///
    /// # Errors
    /// `ReaderError::NotConnected` before open; any Add/Enable/Start
    /// failure propagates and leaves the cycle stopped.
    pub async fn start(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.is_connected() {
            return Err(ReaderError::NotConnected);
        }
        inventory::start(&mut inner).await
    }

    /// Stop continuous inventory, best-effort. No-op unless reading.
    pub async fn stop(&mut self) {
        let mut inner = self.inner.lock().await;
        inventory::stop(&mut inner).await;
    }

    /// Consume the notification feed for the session's lifetime.
    ///
    /// Keepalives re-stamp the liveness clock, cycle events drive the
    /// auto-restart, tag reports are decoded and emitted. Each notification
    /// is handled under the session mutex, which serializes the cycle-event
    /// handler against `stop()`.
    fn spawn_dispatcher(&mut self, mut notifications: mpsc::Receiver<Notification>) {
        let cancel = CancellationToken::new();
        self.dispatcher = Some(cancel.clone());
        let inner = Arc::clone(&self.inner);
        let records_tx = self.records_tx.clone();

        tokio::spawn(async move {
            loop {
                let notification = tokio::select! {
                    _ = cancel.cancelled() => break,
                    notification = notifications.recv() => match notification {
                        Some(notification) => notification,
                        None => {
                            debug!("notification stream ended");
                            break;
                        }
                    },
                };

                match notification {
                    Notification::Keepalive => {
                        inner.lock().await.last_keepalive = Instant::now();
                        trace!("keepalive received");
                    }
                    Notification::Cycle(event) => {
                        let mut inner = inner.lock().await;
                        inventory::handle_cycle_event(&mut inner, event).await;
                    }
                    Notification::TagReport(report) => {
                        for observation in &report.tags {
                            let record = decoder::decode(observation);
                            if records_tx.send(record).await.is_err() {
                                trace!("record consumer dropped, discarding tag report");
                                break;
                            }
                        }
                    }
                }
            }
        });
    }
}

impl<C: ReaderConnection> Drop for UhfReader<C> {
    fn drop(&mut self) {
        // Background tasks must not outlive the session they watch.
        self.watchdog.stop();
        if let Some(cancel) = self.dispatcher.take() {
            cancel.cancel();
        }
    }
}

/// Open a session and run continuous inventory until the watchdog declares
/// the connection lost, then release everything.
///
/// Teardown runs on every exit path: an open failure has already backed
/// itself out, and a start failure still reaches `close()`. Tag records
/// stream to `records_tx` for the duration of the session.
///
/// # Errors
/// Whatever `open()` or `start()` surface; the disconnect-driven shutdown
/// itself is not an error.
pub async fn run_inventory_session<C: ReaderConnection>(
    connection: C,
    options: ReaderOptions,
    records_tx: mpsc::Sender<TagReportRecord>,
) -> Result<()> {
    let mut reader = UhfReader::with_record_sink(options, connection, records_tx);
    reader.open().await?;

    let outcome: Result<()> = async {
        reader.start().await?;
        reader.wait_disconnected().await;
        Ok(())
    }
    .await;

    reader.stop().await;
    reader.close().await;
    outcome
}
