use crate::error::{MeshestraError, Result};
use crate::logger::{DEFAULT_LOG_CONTEXT, TracingLogger};
use dashmap::DashMap;
use std::env;
use std::sync::Arc;

pub const LOG_CONTEXT_KEY: &str = "EXCEPTIONS_LOG_CONTEXT";
pub const LOG_STACK_KEY: &str = "EXCEPTIONS_LOG_STACK";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the process environment
    pub fn from_env() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }

    /// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(MeshestraError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

/// Settings for the default exception filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionsConfig {
    pub log_context: String,
    pub log_stack: bool,
}

impl Default for ExceptionsConfig {
    fn default() -> Self {
        Self {
            log_context: DEFAULT_LOG_CONTEXT.to_string(),
            log_stack: true,
        }
    }
}

impl ExceptionsConfig {
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            log_context: config
                .get(LOG_CONTEXT_KEY)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_context),
            log_stack: config.get_bool(LOG_STACK_KEY)?.unwrap_or(defaults.log_stack),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_config(&ConfigService::from_env())
    }

    pub fn logger(&self) -> TracingLogger {
        TracingLogger::new(self.log_context.clone()).include_stack(self.log_stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = ExceptionsConfig::from_config(&ConfigService::new()).unwrap();
        assert_eq!(config, ExceptionsConfig::default());
        assert_eq!(config.logger().context(), "ExceptionsHandler");
    }

    #[test]
    fn test_reads_overrides() {
        let service = ConfigService::new();
        service.set(LOG_CONTEXT_KEY, "ApiErrors");
        service.set(LOG_STACK_KEY, "off");

        let config = ExceptionsConfig::from_config(&service).unwrap();
        assert_eq!(config.log_context, "ApiErrors");
        assert!(!config.log_stack);
    }

    #[test]
    fn test_blank_context_uses_default() {
        let service = ConfigService::new();
        service.set(LOG_CONTEXT_KEY, "   ");
        let config = ExceptionsConfig::from_config(&service).unwrap();
        assert_eq!(config.log_context, "ExceptionsHandler");
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let service = ConfigService::new();
        service.set(LOG_STACK_KEY, "maybe");
        let err = ExceptionsConfig::from_config(&service).unwrap_err();
        assert!(matches!(err, MeshestraError::InvalidConfig { ref key, .. } if key == LOG_STACK_KEY));
    }
}
