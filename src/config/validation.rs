//! Configuration validation.
//!
//! Semantic checks only; serde has already handled syntax. Returns every
//! problem found rather than stopping at the first.

use reqwest::header::HeaderName;
use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting all errors.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.server.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::new(
                    "server.base_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::new("server.base_url", "missing host"));
            }
        }
        Err(e) => errors.push(ValidationError::new(
            "server.base_url",
            format!("invalid URL '{}': {}", config.server.base_url, e),
        )),
    }

    if !config.csrf.refresh_path.starts_with('/') {
        errors.push(ValidationError::new(
            "csrf.refresh_path",
            "must be an absolute path starting with '/'",
        ));
    }

    if config.csrf.token_field.trim().is_empty() {
        errors.push(ValidationError::new("csrf.token_field", "must not be empty"));
    }

    if HeaderName::from_bytes(config.csrf.header_name.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "csrf.header_name",
            format!("'{}' is not a valid header name", config.csrf.header_name),
        ));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
