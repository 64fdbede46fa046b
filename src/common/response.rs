use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard error body written for exceptions
///
/// Scalar exception messages and unknown errors are wrapped in this shape.
/// Structured payloads of an [`HttpException`](crate::exception::HttpException)
/// bypass it and are sent as given.
///
/// # Example
/// ```
/// use meshestra_exceptions::common::ResponseEnvelope;
/// use axum::http::StatusCode;
///
/// let envelope = ResponseEnvelope::new(StatusCode::BAD_REQUEST, "bad input");
/// assert_eq!(
///     serde_json::to_value(&envelope).unwrap(),
///     serde_json::json!({ "statusCode": 400, "message": "bad input" }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub message: Value,
}

impl ResponseEnvelope {
    pub fn new(status: StatusCode, message: impl Into<Value>) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// The fixed envelope sent for errors whose details must stay private.
    pub fn internal_server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            crate::exception::UNKNOWN_EXCEPTION_MESSAGE,
        )
    }

    /// Status code of the envelope, falling back to 500 for out-of-range values.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn to_value(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_internal_envelope_is_generic() {
        let envelope = ResponseEnvelope::internal_server_error();
        assert_eq!(envelope.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            envelope.to_value().unwrap(),
            json!({ "statusCode": 500, "message": "Internal server error" })
        );
    }

    #[test]
    fn test_out_of_range_status_falls_back() {
        let envelope = ResponseEnvelope {
            status_code: 42,
            message: json!("odd"),
        };
        assert_eq!(envelope.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
