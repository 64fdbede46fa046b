//! Recording doubles shared by the exception tests.

use crate::adapter::{HostArgument, HttpAdapter};
use crate::error::{MeshestraError, Result};
use crate::exception::ArgumentsHost;
use crate::logger::ExceptionLogger;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Reply {
        target: String,
        body: Value,
        status: StatusCode,
    },
    Redirect {
        target: String,
        url: String,
        status: StatusCode,
        location: String,
    },
    LogError {
        message: String,
        stack: Option<String>,
    },
    LogValue(Value),
}

/// Ordered log of adapter and logger calls.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Host whose response argument is the marker string `"response"`.
pub fn host() -> ArgumentsHost {
    let request: Arc<HostArgument> = Arc::new("request".to_string());
    let response: Arc<HostArgument> = Arc::new("response".to_string());
    ArgumentsHost::new(vec![request, response])
}

pub struct RecordingAdapter {
    recorder: Recorder,
}

impl RecordingAdapter {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }

    fn target(response: &HostArgument) -> Result<String> {
        response
            .downcast_ref::<String>()
            .cloned()
            .ok_or_else(MeshestraError::downcast_failed::<String>)
    }
}

impl HttpAdapter for RecordingAdapter {
    fn reply(&self, response: &HostArgument, body: Value, status: StatusCode) -> Result<()> {
        self.recorder.push(Call::Reply {
            target: Self::target(response)?,
            body,
            status,
        });
        Ok(())
    }

    fn redirect(
        &self,
        response: &HostArgument,
        url: &str,
        status: StatusCode,
        location: &str,
    ) -> Result<()> {
        self.recorder.push(Call::Redirect {
            target: Self::target(response)?,
            url: url.to_string(),
            status,
            location: location.to_string(),
        });
        Ok(())
    }
}

pub struct RecordingLogger {
    recorder: Recorder,
}

impl RecordingLogger {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
        }
    }
}

impl ExceptionLogger for RecordingLogger {
    fn error(&self, message: &str, stack: Option<&str>) {
        self.recorder.push(Call::LogError {
            message: message.to_string(),
            stack: stack.map(str::to_string),
        });
    }

    fn error_value(&self, value: &Value) {
        self.recorder.push(Call::LogValue(value.clone()));
    }
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
