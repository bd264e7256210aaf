//! Mock reader connection for testing and development.
//!
//! Simulates the protocol client without a reader on the network: command
//! replies are synthesized (or scripted per command), and the asynchronous
//! feed — keepalives, cycle-boundary events, tag reports — is injected
//! through a [`MockReaderHandle`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tagflow_core::{ReaderError, Result};
use tagflow_llrp::{
    Command, CycleBoundary, Notification, ReaderConfigSummary, Reply, ResponseBody, RoSpecEvent,
    TagObservation, TagReport,
};
use tokio::sync::mpsc;

use crate::traits::{ConnectionAttemptStatus, ReaderConnection};

const NOTIFICATION_CHANNEL_CAPACITY: usize = 32;

#[derive(Debug)]
struct MockState {
    handshake: ConnectionAttemptStatus,
    antenna_ids: Vec<u16>,
    open: bool,
    sent: Vec<Command>,
    scripted: HashMap<&'static str, Reply>,
    notifications: Option<mpsc::Sender<Notification>>,
}

fn lock(state: &Arc<Mutex<MockState>>) -> MutexGuard<'_, MockState> {
    state.lock().expect("mock state poisoned")
}

/// Mock protocol client.
///
/// # Examples
///
/// ```
/// use tagflow_reader::{MockReaderConnection, ReaderConnection};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> tagflow_core::Result<()> {
///     let (mut connection, handle) = MockReaderConnection::new();
///
///     let status = connection.open(Duration::from_millis(100)).await?;
///     assert!(status.is_success());
///     assert!(handle.is_open());
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockReaderConnection {
    state: Arc<Mutex<MockState>>,
}

impl MockReaderConnection {
    /// Create a mock connection reporting four antennas and accepting the
    /// handshake. Returns the connection plus its controlling handle.
    pub fn new() -> (Self, MockReaderHandle) {
        let state = Arc::new(Mutex::new(MockState {
            handshake: ConnectionAttemptStatus::Success,
            antenna_ids: vec![1, 2, 3, 4],
            open: false,
            sent: Vec::new(),
            scripted: HashMap::new(),
            notifications: None,
        }));

        let handle = MockReaderHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }
}

impl ReaderConnection for MockReaderConnection {
    async fn open(&mut self, _timeout: Duration) -> Result<ConnectionAttemptStatus> {
        let mut state = lock(&self.state);
        if state.handshake.is_success() {
            state.open = true;
        }
        Ok(state.handshake)
    }

    async fn send(&mut self, command: Command, _timeout: Duration) -> Result<Reply> {
        let mut state = lock(&self.state);
        if !state.open {
            return Err(ReaderError::NotConnected);
        }

        let name = command.name();
        state.sent.push(command);

        if let Some(reply) = state.scripted.get(name) {
            return Ok(reply.clone());
        }

        let reply = match name {
            "GET_READER_CONFIG" => Reply::success_with(ResponseBody::ReaderConfig(
                ReaderConfigSummary {
                    antenna_ids: state.antenna_ids.clone(),
                },
            )),
            _ => Reply::success(),
        };
        Ok(reply)
    }

    async fn close(&mut self) -> Result<()> {
        let mut state = lock(&self.state);
        state.open = false;
        state.notifications = None;
        Ok(())
    }

    fn subscribe(&mut self) -> mpsc::Receiver<Notification> {
        let (tx, rx) = mpsc::channel(NOTIFICATION_CHANNEL_CAPACITY);
        lock(&self.state).notifications = Some(tx);
        rx
    }
}

/// Handle for driving a [`MockReaderConnection`] from a test.
#[derive(Debug, Clone)]
pub struct MockReaderHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockReaderHandle {
    /// Make the next handshake report the given status.
    pub fn refuse_connection(&self, status: ConnectionAttemptStatus) {
        lock(&self.state).handshake = status;
    }

    /// Set the antenna ids GET_READER_CONFIG reports.
    pub fn set_antenna_ids(&self, ids: Vec<u16>) {
        lock(&self.state).antenna_ids = ids;
    }

    /// Replace the reply for every future command with the given wire name.
    pub fn script_reply(&self, command_name: &'static str, reply: Reply) {
        lock(&self.state).scripted.insert(command_name, reply);
    }

    /// Whether the connection is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    /// Every command sent so far, in order.
    #[must_use]
    pub fn sent_commands(&self) -> Vec<Command> {
        lock(&self.state).sent.clone()
    }

    /// Wire names of every command sent so far, in order.
    #[must_use]
    pub fn command_names(&self) -> Vec<&'static str> {
        lock(&self.state).sent.iter().map(Command::name).collect()
    }

    /// How many commands with the given wire name were sent.
    #[must_use]
    pub fn count_command(&self, name: &str) -> usize {
        lock(&self.state)
            .sent
            .iter()
            .filter(|command| command.name() == name)
            .count()
    }

    /// Forget the command log.
    pub fn clear_sent(&self) {
        lock(&self.state).sent.clear();
    }

    /// Inject a keepalive receipt.
    ///
    /// # Errors
    /// `ReaderError::NotConnected` when no subscriber exists.
    pub async fn send_keepalive(&self) -> Result<()> {
        self.notify(Notification::Keepalive).await
    }

    /// Inject a start-of-cycle event.
    ///
    /// # Errors
    /// `ReaderError::NotConnected` when no subscriber exists.
    pub async fn send_cycle_start(&self, rospec_id: u32) -> Result<()> {
        self.notify(Notification::Cycle(RoSpecEvent {
            boundary: CycleBoundary::Start,
            rospec_id,
        }))
        .await
    }

    /// Inject an end-of-cycle event.
    ///
    /// # Errors
    /// `ReaderError::NotConnected` when no subscriber exists.
    pub async fn send_cycle_end(&self, rospec_id: u32) -> Result<()> {
        self.notify(Notification::Cycle(RoSpecEvent {
            boundary: CycleBoundary::End,
            rospec_id,
        }))
        .await
    }

    /// Inject a tag report carrying the given observations.
    ///
    /// # Errors
    /// `ReaderError::NotConnected` when no subscriber exists.
    pub async fn send_tag_report(&self, tags: Vec<TagObservation>) -> Result<()> {
        self.notify(Notification::TagReport(TagReport { tags })).await
    }

    async fn notify(&self, notification: Notification) -> Result<()> {
        let tx = lock(&self.state)
            .notifications
            .clone()
            .ok_or(ReaderError::NotConnected)?;
        tx.send(notification)
            .await
            .map_err(|_| ReaderError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagflow_core::{ProtocolStatus, StatusCode};
    use tagflow_llrp::GetReaderConfig;

    const TIMEOUT: Duration = Duration::from_millis(100);

    #[tokio::test]
    async fn test_send_before_open_fails() {
        let (mut connection, _handle) = MockReaderConnection::new();
        let result = connection.send(Command::EnableExtensions, TIMEOUT).await;
        assert!(matches!(result, Err(ReaderError::NotConnected)));
    }

    #[tokio::test]
    async fn test_default_replies() {
        let (mut connection, _handle) = MockReaderConnection::new();
        connection.open(TIMEOUT).await.unwrap();

        let reply = connection
            .send(Command::EnableExtensions, TIMEOUT)
            .await
            .unwrap();
        assert_eq!(reply, Reply::success());

        let reply = connection
            .send(Command::GetReaderConfig(GetReaderConfig::all()), TIMEOUT)
            .await
            .unwrap();
        let response = reply.response.unwrap();
        assert_eq!(
            response.body,
            ResponseBody::ReaderConfig(ReaderConfigSummary {
                antenna_ids: vec![1, 2, 3, 4],
            })
        );
    }

    #[tokio::test]
    async fn test_scripted_reply() {
        let (mut connection, handle) = MockReaderConnection::new();
        connection.open(TIMEOUT).await.unwrap();

        handle.script_reply(
            "START_ROSPEC",
            Reply::failure(ProtocolStatus::new(StatusCode::DeviceError, "antenna fault")),
        );

        let reply = connection
            .send(Command::StartRoSpec { rospec_id: 1 }, TIMEOUT)
            .await
            .unwrap();
        assert!(!reply.response.unwrap().status.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_command_log() {
        let (mut connection, handle) = MockReaderConnection::new();
        connection.open(TIMEOUT).await.unwrap();

        connection
            .send(Command::EnableExtensions, TIMEOUT)
            .await
            .unwrap();
        connection
            .send(Command::StartRoSpec { rospec_id: 7 }, TIMEOUT)
            .await
            .unwrap();

        assert_eq!(
            handle.command_names(),
            vec!["ENABLE_EXTENSIONS", "START_ROSPEC"]
        );
        assert_eq!(handle.count_command("START_ROSPEC"), 1);
    }

    #[tokio::test]
    async fn test_notifications_need_subscriber() {
        let (mut connection, handle) = MockReaderConnection::new();
        assert!(handle.send_keepalive().await.is_err());

        let mut rx = connection.subscribe();
        handle.send_keepalive().await.unwrap();
        assert_eq!(rx.recv().await, Some(Notification::Keepalive));
    }

    #[tokio::test]
    async fn test_refused_handshake_stays_closed() {
        let (mut connection, handle) = MockReaderConnection::new();
        handle.refuse_connection(ConnectionAttemptStatus::ClientConnectionExists);

        let status = connection.open(TIMEOUT).await.unwrap();
        assert!(!status.is_success());
        assert!(!handle.is_open());
    }
}
