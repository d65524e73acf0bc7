//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → timeouts (connect/request deadlines set on the reqwest client)
//!     → On 403: retries.rs (refresh token, replay exactly once)
//! ```
//!
//! # Design Decisions
//! - No backoff: the only recovery is a token refresh, not a wait
//! - Retry-once is enforced by the attempt state, not a counter

pub mod retries;

pub use retries::{is_csrf_rejection, Attempt};
