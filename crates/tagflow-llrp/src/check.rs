//! Reply validation — the single choke point after every command.

use crate::reply::Reply;
use tagflow_core::{ReaderError, Result};

/// Validate one command reply against the uniform error taxonomy.
///
/// - Neither a response nor an error message arrived: the window elapsed
///   silently and the command timed out.
/// - A status found on either object with a non-success code becomes a
///   protocol error carrying the code and description.
/// - A reply where neither object exposes any status is a malformed shape.
///
/// No retry happens here; the caller decides whether the error propagates
/// or is swallowed at a teardown boundary.
///
/// # Errors
/// `ReaderError::Timeout`, `ReaderError::Protocol`, or
/// `ReaderError::Internal` as described above.
pub fn check(reply: &Reply) -> Result<()> {
    if reply.response.is_none() && reply.error.is_none() {
        return Err(ReaderError::Timeout);
    }

    let status = reply
        .response
        .as_ref()
        .and_then(|response| response.status.as_ref())
        .or_else(|| reply.error.as_ref().and_then(|error| error.status.as_ref()));

    let Some(status) = status else {
        return Err(ReaderError::internal("reply exposes no status"));
    };

    if !status.is_success() {
        return Err(ReaderError::protocol(
            status.code,
            status.description.clone(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reply::{ErrorMessage, Response, ResponseBody};
    use tagflow_core::{ProtocolStatus, StatusCode};

    #[test]
    fn test_no_reply_at_all_is_timeout() {
        let result = check(&Reply::empty());
        assert!(matches!(result, Err(ReaderError::Timeout)));
    }

    #[test]
    fn test_success_status_passes() {
        assert!(check(&Reply::success()).is_ok());
    }

    #[test]
    fn test_non_success_status_is_protocol_error() {
        let reply = Reply::failure(ProtocolStatus::new(StatusCode::FieldError, "X"));
        let error = check(&reply).unwrap_err();
        assert!(matches!(
            error,
            ReaderError::Protocol {
                code: StatusCode::FieldError,
                ..
            }
        ));
        assert!(error.to_string().contains("X"));
    }

    #[test]
    fn test_status_on_error_object_is_honored() {
        let reply = Reply::error_message(ProtocolStatus::new(StatusCode::DeviceError, "reader busy"));
        let error = check(&reply).unwrap_err();
        assert!(matches!(error, ReaderError::Protocol { .. }));

        let ok = Reply {
            response: None,
            error: Some(ErrorMessage {
                status: Some(ProtocolStatus::success()),
            }),
        };
        assert!(check(&ok).is_ok());
    }

    #[test]
    fn test_statusless_reply_is_internal_error() {
        let reply = Reply {
            response: Some(Response {
                status: None,
                body: ResponseBody::General,
            }),
            error: Some(ErrorMessage { status: None }),
        };
        assert!(matches!(check(&reply), Err(ReaderError::Internal { .. })));
    }

    #[test]
    fn test_response_status_takes_precedence_over_error_status() {
        // When both objects carry a status, the response's wins.
        let reply = Reply {
            response: Some(Response {
                status: Some(ProtocolStatus::success()),
                body: ResponseBody::General,
            }),
            error: Some(ErrorMessage {
                status: Some(ProtocolStatus::new(StatusCode::DeviceError, "stale")),
            }),
        };
        assert!(check(&reply).is_ok());
    }
}
