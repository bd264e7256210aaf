//! Reader-session controller for a fixed-position UHF RFID reader.
//!
//! This crate coordinates three independent timelines over one shared
//! session: the synchronous command/response path, a periodic keepalive
//! watchdog, and the reader's asynchronous notification feed.
//!
//! # Architecture
//!
//! ```text
//! run_inventory_session
//!     │
//!     └─> UhfReader (connection manager)
//!            │
//!            ├─> configurator     (one-shot setup during open)
//!            ├─> inventory        (cycle state machine + auto-restart)
//!            ├─> KeepaliveWatchdog ──> ConnectionLost (one-shot)
//!            ├─> notification dispatcher ──> decoder ──> TagReportRecord
//!            │
//!            └─> ReaderConnection (protocol client, e.g. MockReaderConnection)
//! ```
//!
//! All three timelines serialize on a single session mutex; the only
//! ordering subtlety — an end-of-cycle notification racing an explicit
//! `stop()` — is resolved by clearing the reading flag before the first
//! teardown command inside the same critical section discipline.
//!
//! # Example
//!
//! ```no_run
//! use tagflow_reader::{MockReaderConnection, ReaderOptions, run_inventory_session};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> tagflow_core::Result<()> {
//! let (connection, _handle) = MockReaderConnection::new();
//! let (records_tx, mut records_rx) = mpsc::channel(64);
//!
//! tokio::spawn(async move {
//!     while let Some(record) = records_rx.recv().await {
//!         println!("{record}");
//!     }
//! });
//!
//! run_inventory_session(connection, ReaderOptions::new("192.168.0.30"), records_tx).await?;
//! # Ok(())
//! # }
//! ```

pub mod configurator;
pub mod decoder;
pub mod inventory;
pub mod mock;
pub mod reader;
pub mod session;
pub mod traits;
pub mod watchdog;

pub use decoder::decode;
pub use mock::{MockReaderConnection, MockReaderHandle};
pub use reader::{UhfReader, run_inventory_session};
pub use session::{DisconnectSignal, ReaderOptions, SessionState};
pub use traits::{ConnectionAttemptStatus, ReaderConnection};
