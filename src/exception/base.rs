use super::{
    ArgumentsHost, Exception, ExceptionFilter, HttpException, RESPONSE_ARG_INDEX,
    RedirectionException, RequestHead, UnknownException,
};
use crate::adapter::{AdapterResolver, AxumAdapter, HostArgument, HttpAdapter, HttpAdapterHost};
use crate::common::ResponseEnvelope;
use crate::config::ExceptionsConfig;
use crate::error::{MeshestraError, Result};
use crate::logger::{ExceptionLogger, TracingLogger};
use axum::response::Response;
use std::sync::Arc;

/// Message sent to clients for every error that is not an HTTP exception.
pub const UNKNOWN_EXCEPTION_MESSAGE: &str = "Internal server error";

/// The default exception filter
///
/// - HTTP exceptions are replied verbatim. Structured payloads are sent as they
///   are; scalar messages are wrapped in a [`ResponseEnvelope`].
/// - Redirections are handed to the adapter's `redirect`.
/// - Everything else gets the generic 500 envelope, then is logged.
///
/// The adapter is either given explicitly or looked up through a resolver on
/// every catch, so a filter can be built before the server exists.
///
/// # Example
/// ```
/// use meshestra_exceptions::prelude::*;
///
/// let host = Arc::new(HttpAdapterHost::new());
/// let filter = BaseExceptionFilter::new(None).with_adapter_host(&host);
///
/// // Later, once the server is up:
/// host.set_adapter(Arc::new(AxumAdapter));
/// ```
pub struct BaseExceptionFilter {
    application_ref: Option<Arc<dyn HttpAdapter>>,
    adapter_resolver: Option<AdapterResolver>,
    logger: Arc<dyn ExceptionLogger>,
}

impl BaseExceptionFilter {
    pub fn new(application_ref: Option<Arc<dyn HttpAdapter>>) -> Self {
        Self {
            application_ref,
            adapter_resolver: None,
            logger: Arc::new(TracingLogger::default()),
        }
    }

    /// Filter writing axum responses, logging as configured.
    pub fn from_config(config: &ExceptionsConfig) -> Self {
        Self::new(Some(Arc::new(AxumAdapter))).with_logger(Arc::new(config.logger()))
    }

    pub fn with_logger(mut self, logger: Arc<dyn ExceptionLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Fallback used when no adapter was given explicitly.
    pub fn with_adapter_resolver(mut self, resolver: AdapterResolver) -> Self {
        self.adapter_resolver = Some(resolver);
        self
    }

    pub fn with_adapter_host(self, host: &Arc<HttpAdapterHost>) -> Self {
        self.with_adapter_resolver(host.resolver())
    }

    /// The explicit adapter if set, otherwise whatever the resolver yields.
    pub fn application_ref(&self) -> Result<Arc<dyn HttpAdapter>> {
        if let Some(adapter) = &self.application_ref {
            return Ok(Arc::clone(adapter));
        }
        self.adapter_resolver
            .as_ref()
            .and_then(|resolve| resolve())
            .ok_or(MeshestraError::AdapterUnavailable)
    }

    /// Catch `exception` outside of a request and return the response.
    pub fn respond(&self, exception: Exception) -> Response {
        super::respond(self, exception, RequestHead::default())
    }

    pub fn handle_http_exception(
        &self,
        exception: &HttpException,
        host: &ArgumentsHost,
        application_ref: &dyn HttpAdapter,
    ) -> Result<()> {
        let body = if exception.is_structured() {
            exception.response().clone()
        } else {
            ResponseEnvelope::new(exception.status(), exception.response().clone()).to_value()?
        };
        application_ref.reply(response_arg(host)?, body, exception.status())
    }

    /// Replies with the generic 500 envelope, then logs the exception.
    ///
    /// The exception is logged whether or not the reply succeeded. Error-like values are logged with their message and stack, anything else
    /// as the raw value.
    pub fn handle_unknown_error(
        &self,
        exception: &UnknownException,
        host: &ArgumentsHost,
        application_ref: &dyn HttpAdapter,
    ) -> Result<()> {
        let replied = response_arg(host).and_then(|response| {
            let body = ResponseEnvelope::internal_server_error();
            application_ref.reply(response, body.to_value()?, body.status())
        });

        // Logged whether or not the reply went out.
        match exception.message() {
            Some(message) => self.logger.error(&message, exception.stack().as_deref()),
            None => self.logger.error_value(&exception.to_value()),
        }
        replied
    }

    pub fn handle_redirection_exception(
        &self,
        exception: &RedirectionException,
        host: &ArgumentsHost,
        application_ref: &dyn HttpAdapter,
    ) -> Result<()> {
        application_ref.redirect(
            response_arg(host)?,
            exception.url(),
            exception.status(),
            exception.location(),
        )
    }

    pub fn is_exception_object(exception: &UnknownException) -> bool {
        exception.message().is_some()
    }
}

impl Default for BaseExceptionFilter {
    fn default() -> Self {
        Self::from_config(&ExceptionsConfig::default())
    }
}

impl ExceptionFilter for BaseExceptionFilter {
    fn catch(&self, exception: Exception, host: &ArgumentsHost) -> Result<()> {
        let application_ref = self.application_ref()?;
        match &exception {
            Exception::Unknown(unknown) => {
                self.handle_unknown_error(unknown, host, application_ref.as_ref())
            }
            Exception::Redirection(redirect) => {
                self.handle_redirection_exception(redirect, host, application_ref.as_ref())
            }
            Exception::Http(http) => {
                self.handle_http_exception(http, host, application_ref.as_ref())
            }
        }
    }
}

fn response_arg(host: &ArgumentsHost) -> Result<&HostArgument> {
    host.get_arg_by_index(RESPONSE_ARG_INDEX)
        .ok_or(MeshestraError::ContextArgumentMissing {
            index: RESPONSE_ARG_INDEX,
        })
}
