use axum::http::StatusCode;
use serde_json::{Value, json};
use thiserror::Error;

/// An error carrying an HTTP status code and the payload to send back.
///
/// The payload is either structured (a JSON object or array), which is sent
/// unchanged, or a scalar message, which the filter wraps in a
/// [`ResponseEnvelope`](crate::common::ResponseEnvelope).
///
/// # Example
/// ```
/// use meshestra_exceptions::HttpException;
/// use axum::http::StatusCode;
/// use serde_json::json;
///
/// let plain = HttpException::new("bad input", StatusCode::BAD_REQUEST);
/// assert_eq!(plain.response(), &json!("bad input"));
///
/// let builtin = HttpException::not_found("User not found");
/// assert_eq!(
///     builtin.response(),
///     &json!({ "statusCode": 404, "message": "User not found", "error": "Not Found" }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", self.message())]
pub struct HttpException {
    status: StatusCode,
    response: Value,
}

impl HttpException {
    pub fn new(response: impl Into<Value>, status: StatusCode) -> Self {
        Self {
            status,
            response: response.into(),
        }
    }

    /// Body in the shape of the built-in exceptions: `{ statusCode, message, error }`,
    /// where `error` is the canonical reason phrase of `status`.
    pub fn with_reason(message: impl Into<Value>, status: StatusCode) -> Self {
        let body = json!({
            "statusCode": status.as_u16(),
            "message": message.into(),
            "error": status.canonical_reason().unwrap_or("Unknown Error"),
        });
        Self::new(body, status)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn response(&self) -> &Value {
        &self.response
    }

    /// Objects and arrays are sent as-is; everything else is a scalar message.
    pub fn is_structured(&self) -> bool {
        matches!(self.response, Value::Object(_) | Value::Array(_))
    }

    /// Human readable message, used for `Display`.
    pub fn message(&self) -> String {
        match &self.response {
            Value::String(s) => s.clone(),
            Value::Object(map) => match map.get("message") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => self.response.to_string(),
            },
            other => other.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::NOT_FOUND)
    }

    pub fn method_not_allowed(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::METHOD_NOT_ALLOWED)
    }

    pub fn conflict(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::CONFLICT)
    }

    pub fn gone(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::GONE)
    }

    pub fn payload_too_large(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::PAYLOAD_TOO_LARGE)
    }

    pub fn unprocessable_entity(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::UNPROCESSABLE_ENTITY)
    }

    pub fn too_many_requests(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn internal_server_error(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn not_implemented(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::NOT_IMPLEMENTED)
    }

    pub fn bad_gateway(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::BAD_GATEWAY)
    }

    pub fn service_unavailable(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::SERVICE_UNAVAILABLE)
    }

    pub fn gateway_timeout(message: impl Into<Value>) -> Self {
        Self::with_reason(message, StatusCode::GATEWAY_TIMEOUT)
    }
}

/// An HTTP exception that asks for a redirect instead of an error body.
///
/// `url` is the destination the exception was raised with. `location` is the
/// value handed to the adapter for the `Location` header and defaults to `url`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Redirect ({status}) to {url}")]
pub struct RedirectionException {
    url: String,
    status: StatusCode,
    location: Option<String>,
}

impl RedirectionException {
    /// Redirect with `302 Found`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_status(url, StatusCode::FOUND)
    }

    pub fn with_status(url: impl Into<String>, status: StatusCode) -> Self {
        Self {
            url: url.into(),
            status,
            location: None,
        }
    }

    pub fn location_override(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or(&self.url)
    }
}
