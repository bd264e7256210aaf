//! Inventory cycle control.
//!
//! The session runs one inventory plan with a fixed id, duration-bounded so
//! the reader ends every cycle on its own; continuous inventory comes from
//! restarting the plan on each end-of-cycle notification. All functions
//! here run with the session mutex held by the caller, which is what makes
//! the stop-versus-restart race resolvable at all.

use tagflow_core::Result;
use tagflow_core::constants::INVENTORY_ROSPEC_ID;
use tagflow_llrp::{Command, CycleBoundary, RoSpecBuilder, RoSpecEvent};
use tracing::{debug, trace, warn};

use crate::session::SessionInner;
use crate::traits::ReaderConnection;

/// Arm and start the inventory plan: AddRoSpec → EnableRoSpec →
/// StartRoSpec, each reply checked. No-op while already reading; failures
/// propagate and leave the reading flag clear.
pub(crate) async fn start<C: ReaderConnection>(inner: &mut SessionInner<C>) -> Result<()> {
    if inner.reading {
        return Ok(());
    }

    let plan = RoSpecBuilder::new(INVENTORY_ROSPEC_ID)
        .antenna_count(inner.antenna_count)
        .build()?;

    inner.send_checked(Command::AddRoSpec(plan)).await?;
    inner
        .send_checked(Command::EnableRoSpec {
            rospec_id: INVENTORY_ROSPEC_ID,
        })
        .await?;
    inner
        .send_checked(Command::StartRoSpec {
            rospec_id: INVENTORY_ROSPEC_ID,
        })
        .await?;

    inner.reading = true;
    debug!(rospec_id = INVENTORY_ROSPEC_ID, "inventory started");
    Ok(())
}

/// Tear the plan down: StopRoSpec → DisableRoSpec → DeleteRoSpec,
/// best-effort. No-op unless reading.
///
/// The reading flag is cleared before the first teardown command is issued,
/// so an end-of-cycle notification processed concurrently with (or right
/// after) this call observes `reading == false` and does not restart the
/// plan.
pub(crate) async fn stop<C: ReaderConnection>(inner: &mut SessionInner<C>) {
    if !inner.reading {
        return;
    }
    inner.reading = false;

    for command in [
        Command::StopRoSpec {
            rospec_id: INVENTORY_ROSPEC_ID,
        },
        Command::DisableRoSpec {
            rospec_id: INVENTORY_ROSPEC_ID,
        },
        Command::DeleteRoSpec {
            rospec_id: INVENTORY_ROSPEC_ID,
        },
    ] {
        let name = command.name();
        if let Err(error) = inner.send_checked(command).await {
            warn!(command = name, %error, "inventory teardown command failed");
        }
    }
    debug!(rospec_id = INVENTORY_ROSPEC_ID, "inventory stopped");
}

/// React to a cycle-boundary event.
///
/// Start-of-cycle needs no action. End-of-cycle restarts the plan while the
/// session is still reading; a failed restart is logged and dropped — the
/// keepalive watchdog stays the sole resilience mechanism.
pub(crate) async fn handle_cycle_event<C: ReaderConnection>(
    inner: &mut SessionInner<C>,
    event: RoSpecEvent,
) {
    match event.boundary {
        CycleBoundary::Start => {
            trace!(rospec_id = event.rospec_id, "cycle started");
        }
        CycleBoundary::End => {
            if !inner.reading {
                trace!(
                    rospec_id = event.rospec_id,
                    "cycle ended after stop, not restarting"
                );
                return;
            }
            if let Err(error) = inner
                .send_checked(Command::StartRoSpec {
                    rospec_id: event.rospec_id,
                })
                .await
            {
                warn!(rospec_id = event.rospec_id, %error, "cycle auto-restart failed");
            }
        }
    }
}
