//! Asynchronous notifications and raw tag observations.
//!
//! The protocol client delivers everything the reader volunteers — keepalive
//! receipts, cycle-boundary events, and tag reports — as [`Notification`]
//! values on one inbound queue, in arrival order. Heterogeneous report
//! parameters are modeled as closed variant sets and matched exhaustively.

use bytes::Bytes;

/// One message from the reader's asynchronous feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Periodic liveness message, independent of inventory activity.
    Keepalive,
    /// A cycle-boundary (ROSpec) event.
    Cycle(RoSpecEvent),
    /// A batch of tag observations.
    TagReport(TagReport),
}

/// Cycle-boundary event for one ROSpec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoSpecEvent {
    pub boundary: CycleBoundary,
    pub rospec_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleBoundary {
    Start,
    End,
}

/// One RO_ACCESS_REPORT: zero or more tag observations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagReport {
    pub tags: Vec<TagObservation>,
}

/// One raw tag observation as delivered by the protocol client.
///
/// Every field the reader did not include is absent here; normalization
/// into a consumer record is the decoder's job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagObservation {
    /// EPC parameters in delivery order; readers send either the packed
    /// 96-bit form or the variable-length form.
    pub epc: Vec<EpcField>,
    pub antenna_id: Option<u16>,
    pub tag_seen_count: Option<u16>,
    pub channel_index: Option<u16>,
    pub rospec_id: Option<u32>,
    /// Microseconds since the Unix epoch.
    pub first_seen_micros: Option<u64>,
    pub last_seen_micros: Option<u64>,
    pub air_protocol: Vec<AirProtocolTagData>,
    pub vendor: Vec<VendorParameter>,
}

/// EPC identifier parameter variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpcField {
    /// Fixed-length 96-bit EPC.
    Epc96([u8; 12]),
    /// Variable-length EPC data.
    EpcData(Bytes),
}

/// Air-protocol (C1G2) per-tag parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirProtocolTagData {
    PcBits(u16),
    Crc(u16),
}

/// Vendor-extended per-tag measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorParameter {
    /// 12-bit fixed-point phase angle (counts of 360/4096 degrees).
    RfPhaseAngle(u16),
    /// Peak RSSI in hundredths of dBm.
    PeakRssi(i16),
}
