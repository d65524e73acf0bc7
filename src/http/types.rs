//! Shared result and error types for every client call.

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Errors that can occur while talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Path was absolute or resolved outside the configured origin.
    #[error("invalid request path '{0}'")]
    InvalidPath(String),

    /// Arguments rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Connection, TLS, timeout or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("{method} {path} returned {status}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        body: String,
    },

    /// Token endpoint answered with a non-success status.
    #[error("CSRF refresh returned {0}")]
    CsrfRefresh(StatusCode),

    /// Token endpoint body lacked the configured field.
    #[error("CSRF refresh response has no '{0}' field")]
    CsrfTokenMissing(String),

    /// Token cannot be sent as a header value.
    #[error("CSRF token is not a valid header value")]
    MalformedCsrfToken,

    /// Response body did not match the expected shape.
    #[error("failed to decode response body: {0}")]
    Decode(serde_json::Error),

    /// Request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(serde_json::Error),

    /// Client could not be built from its configuration.
    #[error("client configuration error: {0}")]
    Config(String),
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 403 that survived the refresh-and-replay, or a failed refresh.
    TransientAuth,
    /// Any other HTTP status.
    Http,
    /// Network or transport failure.
    Transport,
    /// Rejected locally before dispatch, or a decode/config problem.
    Local,
}

impl ClientError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ClientError::Status { status, .. } if *status == StatusCode::FORBIDDEN => {
                ErrorClass::TransientAuth
            }
            ClientError::CsrfRefresh(_)
            | ClientError::CsrfTokenMissing(_)
            | ClientError::MalformedCsrfToken => ErrorClass::TransientAuth,
            ClientError::Status { .. } => ErrorClass::Http,
            ClientError::Transport(_) => ErrorClass::Transport,
            ClientError::InvalidPath(_)
            | ClientError::InvalidInput(_)
            | ClientError::Decode(_)
            | ClientError::Encode(_)
            | ClientError::Config(_) => ErrorClass::Local,
        }
    }

    /// HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::CsrfRefresh(status) => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::FORBIDDEN)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Result type for client operations.
pub type ApiResult<T> = Result<T, ClientError>;
