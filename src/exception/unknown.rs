use serde_json::Value;

/// A failure the exception layer knows nothing about.
///
/// Its content never reaches the client; it only feeds the logger.
#[derive(Debug)]
pub enum UnknownException {
    /// A proper error value.
    Error(anyhow::Error),
    /// Anything else that was raised, such as a bare string.
    Value(Value),
}

impl UnknownException {
    /// Message of an error-like value.
    ///
    /// Errors, and objects carrying a non-empty string `message`, are error-like.
    pub fn message(&self) -> Option<String> {
        let message = match self {
            Self::Error(err) => err.to_string(),
            Self::Value(Value::Object(map)) => match map.get("message") {
                Some(Value::String(s)) => s.clone(),
                _ => return None,
            },
            Self::Value(_) => return None,
        };
        (!message.is_empty()).then_some(message)
    }

    /// Trace for an error-like value: the cause chain (and backtrace, when
    /// captured) for errors, or the `stack` field of an object.
    pub fn stack(&self) -> Option<String> {
        match self {
            Self::Error(err) => Some(format!("{err:?}")),
            Self::Value(Value::Object(map)) => {
                map.get("stack").and_then(Value::as_str).map(str::to_string)
            }
            Self::Value(_) => None,
        }
    }

    /// The raw value as it would be logged when it is not error-like.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Error(err) => Value::String(err.to_string()),
            Self::Value(value) => value.clone(),
        }
    }
}
