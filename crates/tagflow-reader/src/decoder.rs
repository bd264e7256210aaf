//! Tag-report normalization.
//!
//! A raw observation is whatever subset of fields the reader chose to
//! include; decoding is a pure projection onto [`TagReportRecord`] that
//! never fails and never invents values for absent fields.

use chrono::{DateTime, Utc};
use tagflow_core::constants::{PEAK_RSSI_SCALE, PHASE_DEGREES_PER_COUNT};
use tagflow_core::{Epc, TagReportRecord};
use tagflow_llrp::{AirProtocolTagData, EpcField, TagObservation, VendorParameter};

/// Normalize one raw tag observation.
///
/// The EPC prefers the packed 96-bit parameter and falls back to the
/// variable-length one; the vendor phase angle is converted from 12-bit
/// fixed point to degrees and peak RSSI from hundredths of dBm to dBm.
#[must_use]
pub fn decode(observation: &TagObservation) -> TagReportRecord {
    let epc = observation
        .epc
        .iter()
        .find_map(|field| match field {
            EpcField::Epc96(bytes) => Some(Epc::from_bytes(bytes)),
            EpcField::EpcData(_) => None,
        })
        .or_else(|| {
            observation.epc.iter().find_map(|field| match field {
                EpcField::EpcData(bytes) => Some(Epc::from_bytes(bytes)),
                EpcField::Epc96(_) => None,
            })
        });

    let mut pc_bits = None;
    let mut crc = None;
    for parameter in &observation.air_protocol {
        match parameter {
            AirProtocolTagData::PcBits(value) => pc_bits = Some(*value),
            AirProtocolTagData::Crc(value) => crc = Some(*value),
        }
    }

    let mut phase_angle = None;
    let mut peak_rssi = None;
    for parameter in &observation.vendor {
        match parameter {
            VendorParameter::RfPhaseAngle(raw) => {
                phase_angle = Some(f64::from(*raw) * PHASE_DEGREES_PER_COUNT);
            }
            VendorParameter::PeakRssi(raw) => {
                peak_rssi = Some(f64::from(*raw) / PEAK_RSSI_SCALE);
            }
        }
    }

    TagReportRecord {
        antenna_id: observation.antenna_id,
        epc,
        tag_seen_count: observation.tag_seen_count,
        phase_angle,
        peak_rssi,
        pc_bits,
        crc,
        first_seen: observation.first_seen_micros.and_then(micros_to_utc),
        last_seen: observation.last_seen_micros.and_then(micros_to_utc),
    }
}

fn micros_to_utc(micros: u64) -> Option<DateTime<Utc>> {
    let secs = (micros / 1_000_000) as i64;
    let nanos = ((micros % 1_000_000) * 1_000) as u32;
    DateTime::from_timestamp(secs, nanos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    const EPC96: [u8; 12] = [
        0x30, 0x34, 0x25, 0x7B, 0xF7, 0x19, 0x4E, 0x40, 0x00, 0x00, 0x00, 0x01,
    ];

    #[test]
    fn test_phase_angle_scaling() {
        let observation = TagObservation {
            vendor: vec![VendorParameter::RfPhaseAngle(2048)],
            ..Default::default()
        };
        let record = decode(&observation);
        assert_eq!(record.phase_angle, Some(180.0));
    }

    #[test]
    fn test_peak_rssi_scaling() {
        let observation = TagObservation {
            vendor: vec![VendorParameter::PeakRssi(-6000)],
            ..Default::default()
        };
        let record = decode(&observation);
        assert_eq!(record.peak_rssi, Some(-60.0));
    }

    #[test]
    fn test_missing_vendor_fields_stay_absent() {
        let observation = TagObservation {
            antenna_id: Some(3),
            tag_seen_count: Some(2),
            ..Default::default()
        };
        let record = decode(&observation);
        // Absent means absent, never zero.
        assert_eq!(record.phase_angle, None);
        assert_eq!(record.peak_rssi, None);
        assert_eq!(record.epc, None);
        assert_eq!(record.antenna_id, Some(3));
        assert_eq!(record.tag_seen_count, Some(2));
    }

    #[test]
    fn test_epc96_preferred_over_epc_data() {
        let observation = TagObservation {
            epc: vec![
                EpcField::EpcData(Bytes::from_static(&[0xAA, 0xBB])),
                EpcField::Epc96(EPC96),
            ],
            ..Default::default()
        };
        let record = decode(&observation);
        assert_eq!(
            record.epc.unwrap().as_str(),
            "3034257bf7194e4000000001"
        );
    }

    #[test]
    fn test_epc_data_fallback() {
        let observation = TagObservation {
            epc: vec![EpcField::EpcData(Bytes::from_static(&[0xE2, 0x80, 0x11]))],
            ..Default::default()
        };
        let record = decode(&observation);
        assert_eq!(record.epc.unwrap().as_str(), "e28011");
    }

    #[test]
    fn test_air_protocol_parameters_parsed() {
        let observation = TagObservation {
            air_protocol: vec![
                AirProtocolTagData::PcBits(0x3000),
                AirProtocolTagData::Crc(0xBEEF),
            ],
            ..Default::default()
        };
        let record = decode(&observation);
        assert_eq!(record.pc_bits, Some(0x3000));
        assert_eq!(record.crc, Some(0xBEEF));
    }

    #[test]
    fn test_timestamps_converted() {
        let observation = TagObservation {
            first_seen_micros: Some(1_700_000_000_000_000),
            ..Default::default()
        };
        let record = decode(&observation);
        let first_seen = record.first_seen.unwrap();
        assert_eq!(first_seen.timestamp(), 1_700_000_000);
        assert_eq!(record.last_seen, None);
    }
}
