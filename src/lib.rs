//! Farmer's Marketplace API client library.
//!
//! A credentialed HTTP client for the marketplace REST backend. Every call
//! carries the session cookies and the current CSRF token; a 403 triggers a
//! token refresh and exactly one replay of the rejected request.

pub mod api;
pub mod config;
pub mod http;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::ClientConfig;
pub use http::{ApiRequest, ApiResponse, ApiResult, ClientError, ErrorClass, MarketClient};
