//! Security subsystem.
//!
//! # Responsibilities
//! - CSRF token storage and refresh bookkeeping (csrf.rs)
//!
//! Token values are redacted from logs and marked sensitive on headers.

pub mod csrf;

pub use csrf::{extract_token, CsrfSnapshot, CsrfState, CsrfToken};
