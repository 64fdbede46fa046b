use crate::adapter::ResponseSlot;
use crate::common::ResponseEnvelope;
use crate::error::{MeshestraError, Result};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::error::Error;

mod base;
mod host;
pub mod http;
mod layer;
mod unknown;

#[cfg(test)]
pub(crate) mod testing;

pub use base::{BaseExceptionFilter, UNKNOWN_EXCEPTION_MESSAGE};
pub use host::{ArgumentsHost, RESPONSE_ARG_INDEX, RequestHead};
pub use http::{HttpException, RedirectionException};
pub use layer::{ExceptionFilterLayer, ExceptionFilterMiddleware};
pub use unknown::UnknownException;

/// Anything raised while handling a request.
#[derive(Debug)]
pub enum Exception {
    Http(HttpException),
    Redirection(RedirectionException),
    Unknown(UnknownException),
}

/// Classification of an [`Exception`], used as a log field
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ExceptionKind {
    Http,
    Redirection,
    Unknown,
}

impl Exception {
    /// A raised value that is not an error, such as a bare string.
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Unknown(UnknownException::Value(value.into()))
    }

    /// Recover the typed exception from a type-erased service error.
    pub fn from_boxed(error: Box<dyn Error + Send + Sync>) -> Self {
        let error = match error.downcast::<HttpException>() {
            Ok(http) => return Self::Http(*http),
            Err(other) => other,
        };
        let error = match error.downcast::<RedirectionException>() {
            Ok(redirect) => return Self::Redirection(*redirect),
            Err(other) => other,
        };
        match error.downcast::<MeshestraError>() {
            Ok(internal) => Self::from(*internal),
            Err(other) => Self::Unknown(UnknownException::Error(anyhow::anyhow!(other))),
        }
    }

    pub fn kind(&self) -> ExceptionKind {
        match self {
            Self::Http(_) => ExceptionKind::Http,
            Self::Redirection(_) => ExceptionKind::Redirection,
            Self::Unknown(_) => ExceptionKind::Unknown,
        }
    }

    /// Redirections count as HTTP exceptions too.
    pub fn is_http(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<HttpException> for Exception {
    fn from(exception: HttpException) -> Self {
        Self::Http(exception)
    }
}

impl From<RedirectionException> for Exception {
    fn from(exception: RedirectionException) -> Self {
        Self::Redirection(exception)
    }
}

impl From<UnknownException> for Exception {
    fn from(exception: UnknownException) -> Self {
        Self::Unknown(exception)
    }
}

impl From<anyhow::Error> for Exception {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(UnknownException::Error(error))
    }
}

impl From<MeshestraError> for Exception {
    fn from(error: MeshestraError) -> Self {
        Self::Unknown(UnknownException::Error(anyhow::Error::new(error)))
    }
}

/// The ExceptionFilter trait
///
/// Filters are the terminal handlers for errors raised during request
/// processing. They write the reply through the response object found in the
/// host. The returned error only reports that the reply could not be written.
///
/// Custom filters usually wrap a [`BaseExceptionFilter`] and delegate the cases
/// they do not handle themselves.
///
/// # Example
/// ```
/// use meshestra_exceptions::prelude::*;
///
/// struct TeapotFilter {
///     base: BaseExceptionFilter,
/// }
///
/// impl ExceptionFilter for TeapotFilter {
///     fn catch(&self, exception: Exception, host: &ArgumentsHost) -> Result<()> {
///         match exception {
///             Exception::Unknown(_) => self.base.catch(
///                 HttpException::new("short and stout", StatusCode::IM_A_TEAPOT).into(),
///                 host,
///             ),
///             other => self.base.catch(other, host),
///         }
///     }
/// }
/// ```
pub trait ExceptionFilter: Send + Sync + 'static {
    fn catch(&self, exception: Exception, host: &ArgumentsHost) -> Result<()>;
}

/// Run `exception` through `filter` against a fresh [`ResponseSlot`] and return
/// the response it produced.
///
/// Falls back to the generic 500 envelope when the filter fails or writes nothing.
pub fn respond<F>(filter: &F, exception: Exception, request: RequestHead) -> Response
where
    F: ExceptionFilter + ?Sized,
{
    let slot = ResponseSlot::new();
    let host = ArgumentsHost::http(request, slot.clone());

    if let Err(e) = filter.catch(exception, &host) {
        tracing::error!("Exception filter failed to write a response: {}", e);
        return fallback_response();
    }

    slot.take().unwrap_or_else(|| {
        tracing::error!("Exception filter completed without writing a response");
        fallback_response()
    })
}

fn fallback_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ResponseEnvelope::internal_server_error()),
    )
        .into_response()
}

/// Dispatched through the filter of the enclosing [`ExceptionFilterLayer`], or
/// through a default [`BaseExceptionFilter`] when no layer is installed.
impl IntoResponse for Exception {
    fn into_response(self) -> Response {
        match layer::active_filter() {
            Some(scope) => respond(scope.filter.as_ref(), self, scope.request),
            None => BaseExceptionFilter::default().respond(self),
        }
    }
}

impl IntoResponse for HttpException {
    fn into_response(self) -> Response {
        Exception::from(self).into_response()
    }
}

impl IntoResponse for RedirectionException {
    fn into_response(self) -> Response {
        Exception::from(self).into_response()
    }
}
