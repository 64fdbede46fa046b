//! Log sinks for the exception layer
//!
//! Filters receive their logger at construction time; nothing here is global.

use serde_json::Value;

/// Default context name attached to exception log events
pub const DEFAULT_LOG_CONTEXT: &str = "ExceptionsHandler";

/// Sink for errors the exception layer could not map to a known HTTP reply.
pub trait ExceptionLogger: Send + Sync + 'static {
    /// Log an error-like value by its message and optional stack trace.
    fn error(&self, message: &str, stack: Option<&str>);

    /// Log a raw value that does not look like an error.
    fn error_value(&self, value: &Value);
}

/// An [`ExceptionLogger`] backed by `tracing` events
#[derive(Debug, Clone)]
pub struct TracingLogger {
    context: String,
    include_stack: bool,
}

impl TracingLogger {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            include_stack: true,
        }
    }

    /// Whether stack traces are attached to log events
    pub fn include_stack(mut self, include_stack: bool) -> Self {
        self.include_stack = include_stack;
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CONTEXT)
    }
}

impl ExceptionLogger for TracingLogger {
    fn error(&self, message: &str, stack: Option<&str>) {
        match stack.filter(|_| self.include_stack) {
            Some(stack) => tracing::error!(context = %self.context, stack = %stack, "{}", message),
            None => tracing::error!(context = %self.context, "{}", message),
        }
    }

    fn error_value(&self, value: &Value) {
        match value {
            Value::String(s) => tracing::error!(context = %self.context, "{}", s),
            other => tracing::error!(context = %self.context, "{}", other),
        }
    }
}
