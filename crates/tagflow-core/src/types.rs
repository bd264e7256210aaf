use crate::{Result, error::ReaderError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Antenna identifier (1-based, per the LLRP antenna numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AntennaId(u16);

impl AntennaId {
    /// Create a new antenna id with validation.
    ///
    /// # Errors
    /// Returns `ReaderError::InvalidData` if the id is zero; antenna 0 is
    /// the protocol's "all antennas" wildcard and never identifies a port.
    pub fn new(id: u16) -> Result<Self> {
        if id == 0 {
            return Err(ReaderError::invalid_data("Antenna id 0 is reserved"));
        }
        Ok(AntennaId(id))
    }

    /// Get the raw antenna id.
    #[must_use]
    pub fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for AntennaId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Electronic Product Code rendered as lowercase hex with no separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Epc(String);

impl Epc {
    /// Create an EPC from a hex string.
    ///
    /// The input is normalized to lowercase before validation.
    ///
    /// # Errors
    /// Returns `ReaderError::InvalidData` if the string is empty or
    /// contains non-hex characters.
    pub fn new(hex: &str) -> Result<Self> {
        let hex = hex.trim().to_ascii_lowercase();
        if hex.is_empty() {
            return Err(ReaderError::invalid_data("EPC must not be empty"));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ReaderError::invalid_data(format!("EPC is not hex: {hex}")));
        }
        Ok(Epc(hex))
    }

    /// Create an EPC from raw identifier bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        use fmt::Write;

        let mut hex = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            let _ = write!(hex, "{b:02x}");
        }
        Epc(hex)
    }

    /// Get the EPC as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Epc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Epc {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        Epc::new(s)
    }
}

/// LLRP status code carried by every command reply.
///
/// The closed set covers the codes this controller reacts to; anything else
/// is preserved verbatim in `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    Success,
    ParameterError,
    FieldError,
    UnexpectedParameter,
    UnknownParameter,
    UnsupportedMessage,
    UnsupportedVersion,
    DeviceError,
    Other(u16),
}

impl StatusCode {
    /// Create a status code from the wire value.
    #[must_use]
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => StatusCode::Success,
            100 => StatusCode::ParameterError,
            101 => StatusCode::FieldError,
            102 => StatusCode::UnexpectedParameter,
            107 => StatusCode::UnknownParameter,
            109 => StatusCode::UnsupportedMessage,
            110 => StatusCode::UnsupportedVersion,
            401 => StatusCode::DeviceError,
            other => StatusCode::Other(other),
        }
    }

    /// Convert the status code to its wire value.
    #[must_use]
    pub fn to_u16(self) -> u16 {
        match self {
            StatusCode::Success => 0,
            StatusCode::ParameterError => 100,
            StatusCode::FieldError => 101,
            StatusCode::UnexpectedParameter => 102,
            StatusCode::UnknownParameter => 107,
            StatusCode::UnsupportedMessage => 109,
            StatusCode::UnsupportedVersion => 110,
            StatusCode::DeviceError => 401,
            StatusCode::Other(value) => value,
        }
    }

    /// Returns `true` for the success code.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, StatusCode::Success)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusCode::Success => write!(f, "M_Success"),
            StatusCode::ParameterError => write!(f, "M_ParameterError"),
            StatusCode::FieldError => write!(f, "M_FieldError"),
            StatusCode::UnexpectedParameter => write!(f, "M_UnexpectedParameter"),
            StatusCode::UnknownParameter => write!(f, "M_UnknownParameter"),
            StatusCode::UnsupportedMessage => write!(f, "M_UnsupportedMessage"),
            StatusCode::UnsupportedVersion => write!(f, "M_UnsupportedVersion"),
            StatusCode::DeviceError => write!(f, "R_DeviceError"),
            StatusCode::Other(value) => write!(f, "M_Status({value})"),
        }
    }
}

/// Status code plus human-readable description from a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStatus {
    pub code: StatusCode,
    pub description: String,
}

impl ProtocolStatus {
    /// Create a new protocol status.
    pub fn new(code: StatusCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }

    /// The success status with an empty description.
    #[must_use]
    pub fn success() -> Self {
        Self::new(StatusCode::Success, "")
    }

    /// Returns `true` if this status reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

impl fmt::Display for ProtocolStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

/// One normalized tag observation, emitted per report and not retained.
///
/// Fields absent in the raw observation stay `None`; nothing is defaulted
/// to zero. PC bits and CRC are parsed for completeness but carry no
/// downstream meaning here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TagReportRecord {
    pub antenna_id: Option<u16>,
    pub epc: Option<Epc>,
    pub tag_seen_count: Option<u16>,
    /// Vendor RF phase angle in degrees.
    pub phase_angle: Option<f64>,
    /// Vendor peak RSSI in dBm.
    pub peak_rssi: Option<f64>,
    pub pc_bits: Option<u16>,
    pub crc: Option<u16>,
    pub first_seen: Option<DateTime<Utc>>,
    pub last_seen: Option<DateTime<Utc>>,
}

impl TagReportRecord {
    /// Serialize as the consumer line format:
    /// `antenna_id,epc_hex,tag_seen_count,phase_angle,peak_rssi`, with
    /// absent fields rendered empty.
    #[must_use]
    pub fn to_csv(&self) -> String {
        fn cell<T: fmt::Display>(value: &Option<T>) -> String {
            value.as_ref().map(T::to_string).unwrap_or_default()
        }

        format!(
            "{},{},{},{},{}",
            cell(&self.antenna_id),
            cell(&self.epc),
            cell(&self.tag_seen_count),
            cell(&self.phase_angle),
            cell(&self.peak_rssi),
        )
    }
}

impl fmt::Display for TagReportRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_csv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(u16::MAX)]
    fn test_antenna_id_valid(#[case] id: u16) {
        let antenna = AntennaId::new(id).unwrap();
        assert_eq!(antenna.as_u16(), id);
    }

    #[test]
    fn test_antenna_id_zero_rejected() {
        assert!(AntennaId::new(0).is_err());
    }

    #[rstest]
    #[case("30340bcd", "30340bcd")]
    #[case("30340BCD", "30340bcd")]
    #[case("  e2801160  ", "e2801160")]
    fn test_epc_normalized(#[case] input: &str, #[case] expected: &str) {
        let epc: Epc = input.parse().unwrap();
        assert_eq!(epc.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("30 34")]
    #[case("not-hex")]
    fn test_epc_invalid(#[case] input: &str) {
        assert!(Epc::new(input).is_err());
    }

    #[test]
    fn test_epc_from_bytes() {
        let epc = Epc::from_bytes(&[0x30, 0x34, 0x0B, 0xCD]);
        assert_eq!(epc.as_str(), "30340bcd");
    }

    #[rstest]
    #[case(0, StatusCode::Success)]
    #[case(100, StatusCode::ParameterError)]
    #[case(101, StatusCode::FieldError)]
    #[case(401, StatusCode::DeviceError)]
    #[case(999, StatusCode::Other(999))]
    fn test_status_code_round_trip(#[case] wire: u16, #[case] expected: StatusCode) {
        let code = StatusCode::from_u16(wire);
        assert_eq!(code, expected);
        assert_eq!(code.to_u16(), wire);
    }

    #[test]
    fn test_protocol_status_success() {
        assert!(ProtocolStatus::success().is_success());
        assert!(!ProtocolStatus::new(StatusCode::DeviceError, "boom").is_success());
    }

    #[test]
    fn test_record_csv_full() {
        let record = TagReportRecord {
            antenna_id: Some(2),
            epc: Some(Epc::new("30340bcd").unwrap()),
            tag_seen_count: Some(7),
            phase_angle: Some(180.0),
            peak_rssi: Some(-60.0),
            ..Default::default()
        };
        assert_eq!(record.to_csv(), "2,30340bcd,7,180,-60");
    }

    #[test]
    fn test_record_serializes_to_json() {
        let record = TagReportRecord {
            antenna_id: Some(1),
            epc: Some(Epc::new("30340bcd").unwrap()),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"antenna_id\":1"));
        assert!(json.contains("30340bcd"));
    }

    #[test]
    fn test_record_csv_absent_fields_render_empty() {
        let record = TagReportRecord {
            antenna_id: Some(1),
            epc: Some(Epc::new("e280").unwrap()),
            tag_seen_count: Some(1),
            ..Default::default()
        };
        // Absent phase and RSSI must be empty, never zero.
        assert_eq!(record.to_csv(), "1,e280,1,,");
    }
}
