//! Protocol and session constants for the tagflow reader controller.
//!
//! These values mirror the behavior of the fixed-position deployment this
//! controller was written for: one reader, one inventory plan, continuous
//! cycling. Timer values are deliberately related — the keepalive timeout
//! must exceed the keepalive send period by a wide margin so ordinary
//! delivery jitter never looks like a dead session.

use std::time::Duration;

// ============================================================================
// Connection
// ============================================================================

/// Default LLRP port for reader connections.
pub const DEFAULT_LLRP_PORT: u16 = 5084;

/// Default window for a single command/response exchange.
///
/// Every command blocks up to this long for its matching reply; this is the
/// only bound on an in-flight command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(3000);

// ============================================================================
// Keepalive / watchdog
// ============================================================================

/// Keepalive trigger period installed on the reader during configuration.
///
/// The reader emits one keepalive message per period, independent of
/// inventory activity.
pub const KEEPALIVE_PERIOD: Duration = Duration::from_millis(15_000);

/// Watchdog tick period.
///
/// The watchdog re-checks keepalive freshness on this interval regardless of
/// protocol traffic.
pub const WATCHDOG_TICK: Duration = Duration::from_millis(5_000);

/// Silence threshold after which the session is declared dead.
///
/// Twice [`KEEPALIVE_PERIOD`]: a single lost or late keepalive never trips
/// the watchdog.
pub const KEEPALIVE_TIMEOUT: Duration = Duration::from_millis(30_000);

// ============================================================================
// Inventory plan
// ============================================================================

/// The single ROSpec identifier used for the session's inventory plan.
///
/// Exactly one ROSpec exists per session; the same id is reused across every
/// start/stop within the session.
pub const INVENTORY_ROSPEC_ID: u32 = 14_150;

/// Inventory parameter spec identifier inside the ROSpec's AISpec.
pub const INVENTORY_PARAMETER_SPEC_ID: u32 = 14_151;

/// Duration stop trigger for one inventory cycle, in milliseconds.
///
/// The plan self-terminates after this long and the cycle controller
/// restarts it on the end-of-cycle notification. Chosen empirically for
/// this deployment; not validated against reader capabilities.
pub const CYCLE_DURATION_MS: u32 = 500;

/// Report trigger threshold: emit a report upon the first tag seen or at
/// end of cycle, whichever comes first.
pub const REPORT_UPON_N_TAGS: u16 = 1;

/// Antenna count assumed until discovery reports the real number.
pub const DEFAULT_ANTENNA_COUNT: u16 = 4;

// ============================================================================
// RF configuration
// ============================================================================

/// Transmit power table index installed per antenna (15.00 dBm).
pub const TRANSMIT_POWER_INDEX: u16 = 21;

/// Receiver sensitivity table index installed per antenna (-80.00 dBm).
pub const RECEIVER_SENSITIVITY_INDEX: u16 = 1;

/// Channel index installed per antenna.
pub const CHANNEL_INDEX: u16 = 1;

/// Hop table id installed per antenna.
pub const HOP_TABLE_ID: u16 = 0;

// ============================================================================
// Report field scaling
// ============================================================================

/// Degrees per count of the 12-bit vendor phase-angle field.
pub const PHASE_DEGREES_PER_COUNT: f64 = 360.0 / 4096.0;

/// Divisor converting the vendor peak-RSSI field (hundredths of dBm) to dBm.
pub const PEAK_RSSI_SCALE: f64 = 100.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watchdog_threshold_exceeds_keepalive_period() {
        // A single missed keepalive must not look like a dead session.
        assert!(KEEPALIVE_TIMEOUT >= KEEPALIVE_PERIOD * 2);
        assert!(WATCHDOG_TICK < KEEPALIVE_TIMEOUT);
    }

    #[test]
    fn test_phase_scaling_full_circle() {
        assert_eq!(4096.0 * PHASE_DEGREES_PER_COUNT, 360.0);
    }
}
