//! Reply shapes returned by the protocol client.
//!
//! A command exchange yields a [`Reply`]: possibly a typed response,
//! possibly a protocol-level error message, possibly neither (nothing
//! arrived within the command window). The [`crate::check`] choke point is
//! the only place that interprets this pair.

use tagflow_core::ProtocolStatus;

/// Outcome of one command/response exchange.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    /// The matching response message, if one arrived.
    pub response: Option<Response>,
    /// An ERROR_MESSAGE sent in place of the response, if one arrived.
    pub error: Option<ErrorMessage>,
}

impl Reply {
    /// A reply window that elapsed with nothing at all.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A plain success response with no payload.
    #[must_use]
    pub fn success() -> Self {
        Self {
            response: Some(Response {
                status: Some(ProtocolStatus::success()),
                body: ResponseBody::General,
            }),
            error: None,
        }
    }

    /// A success response carrying a payload.
    #[must_use]
    pub fn success_with(body: ResponseBody) -> Self {
        Self {
            response: Some(Response {
                status: Some(ProtocolStatus::success()),
                body,
            }),
            error: None,
        }
    }

    /// A response carrying a non-success status.
    #[must_use]
    pub fn failure(status: ProtocolStatus) -> Self {
        Self {
            response: Some(Response {
                status: Some(status),
                body: ResponseBody::General,
            }),
            error: None,
        }
    }

    /// An ERROR_MESSAGE carrying the status, with no response at all.
    #[must_use]
    pub fn error_message(status: ProtocolStatus) -> Self {
        Self {
            response: None,
            error: Some(ErrorMessage {
                status: Some(status),
            }),
        }
    }
}

/// A decoded response message.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The LLRPStatus parameter, when the message carries one.
    pub status: Option<ProtocolStatus>,
    pub body: ResponseBody,
}

/// Response payloads the controller consumes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResponseBody {
    /// Status-only response (the common case).
    #[default]
    General,
    /// GET_READER_CONFIG_RESPONSE payload.
    ReaderConfig(ReaderConfigSummary),
}

/// The slice of GET_READER_CONFIG_RESPONSE the controller needs: which
/// antenna ports the reader reported configuration for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReaderConfigSummary {
    pub antenna_ids: Vec<u16>,
}

impl ReaderConfigSummary {
    /// Number of physical antennas the reader reported.
    #[must_use]
    pub fn antenna_count(&self) -> u16 {
        self.antenna_ids.len() as u16
    }
}

/// An ERROR_MESSAGE delivered instead of a response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorMessage {
    pub status: Option<ProtocolStatus>,
}
