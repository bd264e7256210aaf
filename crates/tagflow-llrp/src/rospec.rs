//! The ROSpec inventory plan and its builder.
//!
//! A ROSpec describes when and how the reader performs one inventory cycle:
//! boundary triggers, the report contract, and the antenna-scoped inventory
//! parameters (AISpec). This controller uses exactly one plan shape — a
//! duration-bounded cycle over every discovered antenna, reported upon the
//! first tag or at end of cycle — so [`RoSpecBuilder`] only exposes the
//! knobs that vary.

use tagflow_core::{
    AntennaId, ReaderError, Result,
    constants::{
        CHANNEL_INDEX, CYCLE_DURATION_MS, HOP_TABLE_ID, INVENTORY_PARAMETER_SPEC_ID,
        RECEIVER_SENSITIVITY_INDEX, REPORT_UPON_N_TAGS, TRANSMIT_POWER_INDEX,
    },
};

/// Lifecycle state of an added ROSpec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoSpecState {
    /// Added but not yet enabled.
    Disabled,
    /// Enabled, waiting for its start trigger (or START_ROSPEC).
    Inactive,
    /// Currently executing a cycle.
    Active,
}

/// A complete inventory plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RoSpec {
    pub id: u32,
    pub priority: u8,
    /// State the plan is declared with; ADD_ROSPEC requires Disabled.
    pub current_state: RoSpecState,
    pub boundary: BoundarySpec,
    pub report: ReportSpec,
    pub ai_spec: AiSpec,
}

/// Start and stop triggers bounding one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundarySpec {
    pub start_trigger: StartTrigger,
    pub stop_trigger: StopTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTrigger {
    /// Start only on an explicit START_ROSPEC.
    Null,
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopTrigger {
    Null,
    /// Self-terminate after the given duration.
    Duration { ms: u32 },
}

/// Report contract: when to emit and which fields to include.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSpec {
    pub trigger: ReportTrigger,
    pub content: ContentSelector,
    pub vendor: VendorReportSelector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    None,
    /// Emit after N tags or at end of the ROSpec, whichever comes first.
    UponNTagsOrEndOfRoSpec { n: u16 },
}

/// Standard per-tag fields requested in each report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentSelector {
    pub antenna_id: bool,
    pub channel_index: bool,
    pub first_seen_timestamp: bool,
    pub last_seen_timestamp: bool,
    pub peak_rssi: bool,
    pub rospec_id: bool,
    pub tag_seen_count: bool,
    pub crc: bool,
    pub pc_bits: bool,
    pub access_spec_id: bool,
    pub inventory_parameter_spec_id: bool,
}

impl ContentSelector {
    /// The field set this controller always requests.
    #[must_use]
    pub fn inventory_defaults() -> Self {
        Self {
            antenna_id: true,
            channel_index: true,
            first_seen_timestamp: true,
            last_seen_timestamp: true,
            peak_rssi: true,
            rospec_id: true,
            tag_seen_count: true,
            crc: true,
            pc_bits: true,
            access_spec_id: false,
            inventory_parameter_spec_id: false,
        }
    }
}

/// Vendor-extended per-tag measurements requested in each report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VendorReportSelector {
    pub phase_angle: bool,
    pub peak_rssi: bool,
}

/// Antenna Inventory Spec: which antennas run the cycle, and with what RF
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSpec {
    pub antenna_ids: Vec<AntennaId>,
    pub stop_trigger: AiStopTrigger,
    pub inventory: InventoryParameterSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiStopTrigger {
    /// Run until the enclosing ROSpec stops.
    Null,
    Duration { ms: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryParameterSpec {
    pub id: u32,
    pub protocol: AirProtocol,
    pub antenna_configs: Vec<AntennaRfConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirProtocol {
    EpcGlobalClass1Gen2,
}

/// Per-antenna RF configuration installed with the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntennaRfConfig {
    pub antenna_id: AntennaId,
    pub transmit_power_index: u16,
    pub channel_index: u16,
    pub hop_table_id: u16,
    pub receiver_sensitivity_index: u16,
}

/// Builder for the session's single inventory plan.
///
/// # Example
/// ```
/// use tagflow_llrp::RoSpecBuilder;
///
/// let plan = RoSpecBuilder::new(14150).antenna_count(4).build().unwrap();
/// assert_eq!(plan.ai_spec.antenna_ids.len(), 4);
/// ```
pub struct RoSpecBuilder {
    id: u32,
    priority: u8,
    cycle_duration_ms: u32,
    report_upon_n_tags: u16,
    antenna_count: u16,
}

impl RoSpecBuilder {
    /// Create a builder with the deployment defaults.
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id,
            priority: 0,
            cycle_duration_ms: CYCLE_DURATION_MS,
            report_upon_n_tags: REPORT_UPON_N_TAGS,
            antenna_count: 0,
        }
    }

    /// Override the duration stop trigger.
    #[must_use]
    pub fn cycle_duration_ms(mut self, ms: u32) -> Self {
        self.cycle_duration_ms = ms;
        self
    }

    /// Override the report trigger threshold.
    #[must_use]
    pub fn report_upon_n_tags(mut self, n: u16) -> Self {
        self.report_upon_n_tags = n;
        self
    }

    /// Cover antennas 1..=count.
    #[must_use]
    pub fn antenna_count(mut self, count: u16) -> Self {
        self.antenna_count = count;
        self
    }

    /// Build the plan.
    ///
    /// # Errors
    /// Returns `ReaderError::InvalidData` if no antennas were given; a plan
    /// covering zero antennas can never produce a report.
    pub fn build(self) -> Result<RoSpec> {
        if self.antenna_count == 0 {
            return Err(ReaderError::invalid_data(
                "inventory plan needs at least one antenna",
            ));
        }

        let mut antenna_ids = Vec::with_capacity(self.antenna_count as usize);
        let mut antenna_configs = Vec::with_capacity(self.antenna_count as usize);
        for id in 1..=self.antenna_count {
            let antenna_id = AntennaId::new(id)?;
            antenna_ids.push(antenna_id);
            antenna_configs.push(AntennaRfConfig {
                antenna_id,
                transmit_power_index: TRANSMIT_POWER_INDEX,
                channel_index: CHANNEL_INDEX,
                hop_table_id: HOP_TABLE_ID,
                receiver_sensitivity_index: RECEIVER_SENSITIVITY_INDEX,
            });
        }

        Ok(RoSpec {
            id: self.id,
            priority: self.priority,
            current_state: RoSpecState::Disabled,
            boundary: BoundarySpec {
                start_trigger: StartTrigger::Null,
                stop_trigger: StopTrigger::Duration {
                    ms: self.cycle_duration_ms,
                },
            },
            report: ReportSpec {
                trigger: ReportTrigger::UponNTagsOrEndOfRoSpec {
                    n: self.report_upon_n_tags,
                },
                content: ContentSelector::inventory_defaults(),
                vendor: VendorReportSelector {
                    phase_angle: true,
                    peak_rssi: true,
                },
            },
            ai_spec: AiSpec {
                antenna_ids,
                stop_trigger: AiStopTrigger::Null,
                inventory: InventoryParameterSpec {
                    id: INVENTORY_PARAMETER_SPEC_ID,
                    protocol: AirProtocol::EpcGlobalClass1Gen2,
                    antenna_configs,
                },
            },
        })
    }
}
