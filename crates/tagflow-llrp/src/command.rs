//! Commands issued by the session controller.
//!
//! The session speaks a small, fixed subset of LLRP: reader configuration,
//! the vendor extension handshake, and the ROSpec lifecycle. Each command
//! blocks for its matching reply; there is no pipelining.

use crate::rospec::RoSpec;

/// A command sent to the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetReaderConfig(SetReaderConfig),
    GetReaderConfig(GetReaderConfig),
    /// Vendor custom message activating the extended parameter set
    /// (phase angle, peak RSSI, extended requested-data).
    EnableExtensions,
    AddRoSpec(RoSpec),
    EnableRoSpec { rospec_id: u32 },
    StartRoSpec { rospec_id: u32 },
    StopRoSpec { rospec_id: u32 },
    DisableRoSpec { rospec_id: u32 },
    DeleteRoSpec { rospec_id: u32 },
}

impl Command {
    /// Wire-level message name, used for logging and mock scripting.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetReaderConfig(_) => "SET_READER_CONFIG",
            Command::GetReaderConfig(_) => "GET_READER_CONFIG",
            Command::EnableExtensions => "ENABLE_EXTENSIONS",
            Command::AddRoSpec(_) => "ADD_ROSPEC",
            Command::EnableRoSpec { .. } => "ENABLE_ROSPEC",
            Command::StartRoSpec { .. } => "START_ROSPEC",
            Command::StopRoSpec { .. } => "STOP_ROSPEC",
            Command::DisableRoSpec { .. } => "DISABLE_ROSPEC",
            Command::DeleteRoSpec { .. } => "DELETE_ROSPEC",
        }
    }

    /// SET_READER_CONFIG carrying only the factory-reset flag.
    #[must_use]
    pub fn reset_to_factory_default() -> Self {
        Command::SetReaderConfig(SetReaderConfig {
            reset_to_factory_default: true,
            ..SetReaderConfig::default()
        })
    }
}

/// Reader configuration installed by SET_READER_CONFIG.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SetReaderConfig {
    pub reset_to_factory_default: bool,
    pub keepalive: Option<KeepaliveSpec>,
    pub event_notifications: Vec<EventNotificationState>,
}

/// Keepalive trigger installed on the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepaliveSpec {
    Disabled,
    /// One keepalive message per period, independent of inventory traffic.
    Periodic { period_ms: u32 },
}

/// Subscription state for one reader event class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventNotificationState {
    pub event: NotificationEvent,
    pub enabled: bool,
}

/// Reader event classes the controller can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    /// Cycle-boundary (start/end of ROSpec) events.
    RoSpecEvent,
    AntennaEvent,
    ReaderExceptionEvent,
}

/// Configuration query sent by GET_READER_CONFIG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetReaderConfig {
    pub requested_data: RequestedData,
    pub vendor_requested_data: Option<VendorRequestedData>,
}

impl GetReaderConfig {
    /// Query everything, including the vendor configuration block.
    #[must_use]
    pub fn all() -> Self {
        Self {
            requested_data: RequestedData::All,
            vendor_requested_data: Some(VendorRequestedData::AllConfiguration),
        }
    }
}

/// Standard requested-data selector for GET_READER_CONFIG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestedData {
    #[default]
    All,
    Identification,
    AntennaProperties,
    AntennaConfiguration,
}

/// Vendor requested-data selector for GET_READER_CONFIG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorRequestedData {
    AllConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_reset_shape() {
        let Command::SetReaderConfig(config) = Command::reset_to_factory_default() else {
            panic!("expected SET_READER_CONFIG");
        };
        assert!(config.reset_to_factory_default);
        assert!(config.keepalive.is_none());
        assert!(config.event_notifications.is_empty());
    }

    #[test]
    fn test_command_names() {
        assert_eq!(Command::EnableExtensions.name(), "ENABLE_EXTENSIONS");
        assert_eq!(Command::StartRoSpec { rospec_id: 1 }.name(), "START_ROSPEC");
        assert_eq!(
            Command::GetReaderConfig(GetReaderConfig::all()).name(),
            "GET_READER_CONFIG"
        );
    }
}
