//! One-shot reader configuration, run synchronously during open.
//!
//! Four commands, in order, any failure aborting the rest:
//! factory reset, vendor extension handshake, configuration query
//! (which discovers the physical antenna count), and installation of the
//! keepalive trigger plus cycle-boundary event notifications.

use tagflow_core::Result;
use tagflow_core::constants::KEEPALIVE_PERIOD;
use tagflow_llrp::{
    Command, EventNotificationState, GetReaderConfig, KeepaliveSpec, NotificationEvent,
    ResponseBody, SetReaderConfig,
};
use tracing::debug;

use crate::session::SessionInner;
use crate::traits::ReaderConnection;

/// Commit the reader to a known baseline and prepare it for inventory.
pub(crate) async fn configure<C: ReaderConnection>(inner: &mut SessionInner<C>) -> Result<()> {
    reset_to_defaults(inner).await?;
    discover_antennas(inner).await?;
    install_session_config(inner).await?;
    Ok(())
}

/// Factory reset followed by the vendor extension handshake.
///
/// The extension handshake must follow the reset: a reset drops the
/// vendor message set, and later steps depend on it. Close-time cleanup
/// reuses this pair to leave the reader in a known state.
pub(crate) async fn reset_to_defaults<C: ReaderConnection>(
    inner: &mut SessionInner<C>,
) -> Result<()> {
    inner
        .send_checked(Command::reset_to_factory_default())
        .await?;
    inner.send_checked(Command::EnableExtensions).await?;
    Ok(())
}

/// Query the full configuration and record the reported antenna count.
///
/// The count becomes authoritative for every inventory plan built in this
/// session; when the reply omits the configuration block the assumed
/// default stands.
async fn discover_antennas<C: ReaderConnection>(inner: &mut SessionInner<C>) -> Result<()> {
    let reply = inner
        .send_checked(Command::GetReaderConfig(GetReaderConfig::all()))
        .await?;

    if let Some(response) = reply.response {
        if let ResponseBody::ReaderConfig(summary) = response.body {
            inner.antenna_count = summary.antenna_count();
            debug!(antennas = inner.antenna_count, "discovered antenna count");
        }
    }
    Ok(())
}

/// Install the periodic keepalive trigger and subscribe to cycle-boundary
/// events.
async fn install_session_config<C: ReaderConnection>(inner: &mut SessionInner<C>) -> Result<()> {
    let config = SetReaderConfig {
        reset_to_factory_default: false,
        keepalive: Some(KeepaliveSpec::Periodic {
            period_ms: KEEPALIVE_PERIOD.as_millis() as u32,
        }),
        event_notifications: vec![EventNotificationState {
            event: NotificationEvent::RoSpecEvent,
            enabled: true,
        }],
    };
    inner.send_checked(Command::SetReaderConfig(config)).await?;
    Ok(())
}
