use crate::exception::Exception;
use axum::response::IntoResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeshestraError>;

#[derive(Debug, Error)]
pub enum MeshestraError {
    /// No explicit adapter was configured and the host has none bound.
    #[error("No HTTP adapter available: configure one explicitly or bind it on the HttpAdapterHost")]
    AdapterUnavailable,

    #[error("Execution context has no argument at index {index}")]
    ContextArgumentMissing { index: usize },

    #[error("Failed to downcast type: {type_name}")]
    DowncastFailed { type_name: String },

    #[error("Invalid redirect location {location:?}: {message}")]
    InvalidRedirect { location: String, message: String },

    #[error("Invalid configuration value for {key}: {value:?}")]
    InvalidConfig { key: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MeshestraError {
    pub fn downcast_failed<T: ?Sized>() -> Self {
        Self::DowncastFailed {
            type_name: std::any::type_name::<T>().to_string(),
        }
    }
}

impl IntoResponse for MeshestraError {
    fn into_response(self) -> axum::response::Response {
        // Crate errors describe internals; they go through the unknown-error path
        // so the client only sees the generic envelope.
        Exception::from(self).into_response()
    }
}
