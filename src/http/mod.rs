//! HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! ApiRequest (method, path, replayable body)
//!     → client.rs (resolve against base origin, merge CSRF + request ID headers)
//!     → reqwest (cookie jar, timeouts)
//!     → 403? security::csrf refresh → replay once
//!     → response.rs (buffered ApiResponse)
//!     → caller matches on ApiResult / ClientError
//! ```

pub mod client;
pub mod request;
pub mod response;
pub mod types;

pub use client::MarketClient;
pub use request::{ApiRequest, RequestBody, RequestId, X_REQUEST_ID};
pub use response::ApiResponse;
pub use types::{ApiResult, ClientError, ErrorClass};
