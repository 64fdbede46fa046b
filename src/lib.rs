//! # Meshestra Exceptions
//!
//! The default exception layer of the Meshestra web framework.
//!
//! Every error that escapes a request handler ends up in an [`ExceptionFilter`].
//! The built-in [`BaseExceptionFilter`] classifies it and writes the reply through
//! an [`HttpAdapter`]:
//!
//! - **HTTP exceptions** are sent verbatim: structured payloads as-is, scalar
//!   messages wrapped as `{ "statusCode": .., "message": .. }`.
//! - **Redirections** become a redirect, with no body and no logging.
//! - **Anything else** gets a generic `500 Internal server error` reply, and the
//!   details go to the logger only.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshestra_exceptions::prelude::*;
//!
//! async fn find_user() -> std::result::Result<Json<()>, HttpException> {
//!     Err(HttpException::not_found("User not found"))
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let app: Router = Router::new()
//!         .route("/users/{id}", axum::routing::get(find_user))
//!         .layer(ExceptionFilterLayer::new(BaseExceptionFilter::default()));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod adapter;
pub mod common;
pub mod config;
pub mod error;
pub mod exception;
pub mod logger;

// Re-export core types
pub use adapter::{AdapterResolver, AxumAdapter, HttpAdapter, HttpAdapterHost, ResponseSlot};
pub use common::ResponseEnvelope;
pub use config::{ConfigService, ExceptionsConfig};
pub use error::{MeshestraError, Result};
pub use exception::{
    ArgumentsHost, BaseExceptionFilter, Exception, ExceptionFilter, HttpException,
    RedirectionException, UNKNOWN_EXCEPTION_MESSAGE, UnknownException,
};
pub use logger::{ExceptionLogger, TracingLogger};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use meshestra_exceptions::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adapter::{AxumAdapter, HttpAdapter, HttpAdapterHost, ResponseSlot};
    pub use crate::common::ResponseEnvelope;
    pub use crate::config::{ConfigService, ExceptionsConfig};
    pub use crate::error::{MeshestraError, Result};
    pub use crate::exception::{
        ArgumentsHost, BaseExceptionFilter, Exception, ExceptionFilter, ExceptionFilterLayer,
        HttpException, RedirectionException, UnknownException,
    };
    pub use crate::logger::{ExceptionLogger, TracingLogger};
    pub use axum::{
        Json, Router,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    pub use std::sync::Arc;
}
