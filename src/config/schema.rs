//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the marketplace client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin and credential settings.
    pub server: ServerConfig,

    /// Anti-forgery token refresh settings.
    pub csrf: CsrfConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base origin every request path is resolved against.
    pub base_url: String,

    /// Keep a cookie jar and send session cookies on every call.
    pub with_credentials: bool,

    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            with_credentials: true,
            user_agent: concat!("marketplace-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// How concurrent 403 responses share token refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Every rejected request performs its own refresh.
    #[default]
    Independent,
    /// Refreshes are serialized; a request that sees a newer token skips its own refresh.
    Coalesced,
}

/// CSRF token refresh configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CsrfConfig {
    /// Path of the token endpoint, relative to the base origin.
    pub refresh_path: String,

    /// JSON field holding the token in the refresh response.
    pub token_field: String,

    /// Header the token is sent in.
    pub header_name: String,

    /// Refresh sharing policy.
    pub refresh_policy: RefreshPolicy,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self {
            refresh_path: "/api/csrf/".to_string(),
            token_field: "csrfToken".to_string(),
            header_name: "X-CSRFToken".to_string(),
            refresh_policy: RefreshPolicy::Independent,
        }
    }
}

/// Timeout configuration applied to every call, refreshes included.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert!(config.server.with_credentials);
        assert_eq!(config.csrf.refresh_path, "/api/csrf/");
        assert_eq!(config.csrf.token_field, "csrfToken");
        assert_eq!(config.csrf.header_name, "X-CSRFToken");
        assert_eq!(config.csrf.refresh_policy, RefreshPolicy::Independent);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [server]
            base_url = "https://market.example.com"

            [csrf]
            refresh_policy = "coalesced"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.base_url, "https://market.example.com");
        assert!(config.server.with_credentials);
        assert_eq!(config.csrf.refresh_policy, RefreshPolicy::Coalesced);
        assert_eq!(config.csrf.header_name, "X-CSRFToken");
        assert_eq!(config.timeouts.request_secs, 30);
    }
}
