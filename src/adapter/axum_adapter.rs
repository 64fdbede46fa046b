use super::{HostArgument, HttpAdapter};
use crate::error::{MeshestraError, Result};
use axum::{
    Json,
    body::Body,
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// The raw outgoing response of one request.
///
/// Axum handlers return their response rather than writing to a socket, so the
/// adapter stores what it produces here and the caller takes it out afterwards.
#[derive(Clone, Default)]
pub struct ResponseSlot {
    inner: Arc<Mutex<Option<Response>>>,
}

impl ResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a response, replacing any earlier one.
    pub fn fill(&self, response: Response) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(response);
    }

    pub fn take(&self) -> Option<Response> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn is_filled(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

/// [`HttpAdapter`] that renders replies as axum responses into a [`ResponseSlot`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AxumAdapter;

impl AxumAdapter {
    fn slot(response: &HostArgument) -> Result<&ResponseSlot> {
        response
            .downcast_ref::<ResponseSlot>()
            .ok_or_else(MeshestraError::downcast_failed::<ResponseSlot>)
    }
}

impl HttpAdapter for AxumAdapter {
    fn reply(&self, response: &HostArgument, body: Value, status: StatusCode) -> Result<()> {
        Self::slot(response)?.fill((status, Json(body)).into_response());
        Ok(())
    }

    fn redirect(
        &self,
        response: &HostArgument,
        _url: &str,
        status: StatusCode,
        location: &str,
    ) -> Result<()> {
        let slot = Self::slot(response)?;
        let location_value =
            HeaderValue::from_str(location).map_err(|e| MeshestraError::InvalidRedirect {
                location: location.to_string(),
                message: e.to_string(),
            })?;

        let mut redirect = Response::new(Body::empty());
        *redirect.status_mut() = status;
        redirect.headers_mut().insert(LOCATION, location_value);
        slot.fill(redirect);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_reply_fills_slot_with_json() {
        let slot = ResponseSlot::new();
        AxumAdapter
            .reply(&slot, json!({ "error": "not found" }), StatusCode::NOT_FOUND)
            .unwrap();

        let response = slot.take().unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "not found" }));
        assert!(!slot.is_filled());
    }

    #[test]
    fn test_redirect_sets_location() {
        let slot = ResponseSlot::new();
        AxumAdapter
            .redirect(&slot, "/home", StatusCode::FOUND, "/home")
            .unwrap();

        let response = slot.take().unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[LOCATION], "/home");
    }

    #[test]
    fn test_invalid_location_is_rejected() {
        let slot = ResponseSlot::new();
        let err = AxumAdapter
            .redirect(&slot, "/x", StatusCode::FOUND, "/bad\nlocation")
            .unwrap_err();
        assert!(matches!(err, MeshestraError::InvalidRedirect { .. }));
        assert!(!slot.is_filled());
    }

    #[test]
    fn test_foreign_response_object_is_rejected() {
        let err = AxumAdapter
            .reply(&"not a slot", json!({}), StatusCode::OK)
            .unwrap_err();
        assert!(matches!(err, MeshestraError::DowncastFailed { .. }));
    }
}
