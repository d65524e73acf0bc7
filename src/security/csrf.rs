//! Per-client CSRF token state.
//!
//! # Responsibilities
//! - Hold the current token for one client instance
//! - Count refreshes so concurrent tasks can tell whether one already happened
//! - Serialize refreshes when the coalesced policy is selected
//!
//! Reads are lock-free (`ArcSwap`); the refresh lock is only taken by the
//! coalesced policy.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::header::HeaderValue;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::http::types::{ApiResult, ClientError};

/// An anti-forgery token. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct CsrfToken {
    value: String,
    header: HeaderValue,
}

impl CsrfToken {
    pub fn new(value: impl Into<String>) -> ApiResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ClientError::MalformedCsrfToken);
        }
        let mut header =
            HeaderValue::from_str(&value).map_err(|_| ClientError::MalformedCsrfToken)?;
        header.set_sensitive(true);
        Ok(Self { value, header })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

impl fmt::Debug for CsrfToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfToken").field("value", &"<redacted>").finish()
    }
}

/// Pull the token out of a refresh response body.
pub fn extract_token(body: &Value, field: &str) -> ApiResult<CsrfToken> {
    match body.get(field).and_then(Value::as_str) {
        Some(token) => CsrfToken::new(token),
        None => Err(ClientError::CsrfTokenMissing(field.to_string())),
    }
}

/// The token together with the generation it was stored at.
#[derive(Debug, Clone, Default)]
pub struct CsrfSnapshot {
    pub generation: u64,
    pub token: Option<CsrfToken>,
}

/// Token slot owned by a single client.
///
/// Token and generation live in one `ArcSwap` cell, so a reader always sees
/// a pair that was stored together.
#[derive(Default)]
pub struct CsrfState {
    slot: ArcSwap<CsrfSnapshot>,
    refresh_lock: Mutex<()>,
}

impl CsrfState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token and generation from a single load.
    pub fn snapshot(&self) -> Arc<CsrfSnapshot> {
        self.slot.load_full()
    }

    pub fn current(&self) -> Option<CsrfToken> {
        self.slot.load().token.clone()
    }

    /// Number of stores and clears so far.
    pub fn generation(&self) -> u64 {
        self.slot.load().generation
    }

    /// Replace the token and bump the generation. Returns the new generation.
    pub fn store(&self, token: CsrfToken) -> u64 {
        let previous = self.slot.rcu(|slot| CsrfSnapshot {
            generation: slot.generation + 1,
            token: Some(token.clone()),
        });
        previous.generation + 1
    }

    /// Forget the token. The generation still moves so waiting tasks refetch.
    pub fn clear(&self) {
        self.slot.rcu(|slot| CsrfSnapshot {
            generation: slot.generation + 1,
            token: None,
        });
    }

    /// Serialize refreshes (coalesced policy).
    pub async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().await
    }
}

impl fmt::Debug for CsrfState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("CsrfState")
            .field("has_token", &snapshot.token.is_some())
            .field("generation", &snapshot.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_token() {
        let token = extract_token(&json!({"csrfToken": "abc123"}), "csrfToken").unwrap();
        assert_eq!(token.as_str(), "abc123");
        assert_eq!(token.header_value(), "abc123");
    }

    #[test]
    fn test_extract_token_missing_or_wrong_type() {
        let err = extract_token(&json!({"token": "abc"}), "csrfToken").unwrap_err();
        assert!(matches!(err, ClientError::CsrfTokenMissing(ref f) if f == "csrfToken"));

        let err = extract_token(&json!({"csrfToken": 42}), "csrfToken").unwrap_err();
        assert!(matches!(err, ClientError::CsrfTokenMissing(_)));
    }

    #[test]
    fn test_rejects_unsendable_tokens() {
        assert!(matches!(CsrfToken::new(""), Err(ClientError::MalformedCsrfToken)));
        assert!(matches!(CsrfToken::new("a\nb"), Err(ClientError::MalformedCsrfToken)));
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = CsrfToken::new("super-secret").unwrap();
        assert!(!format!("{token:?}").contains("super-secret"));
    }

    #[test]
    fn test_store_and_clear_bump_generation() {
        let state = CsrfState::new();
        assert!(state.current().is_none());
        assert_eq!(state.generation(), 0);

        assert_eq!(state.store(CsrfToken::new("one").unwrap()), 1);
        assert_eq!(state.store(CsrfToken::new("two").unwrap()), 2);
        assert_eq!(state.current().unwrap().as_str(), "two");

        state.clear();
        assert!(state.current().is_none());
        assert_eq!(state.generation(), 3);
    }

    #[test]
    fn test_snapshot_pairs_token_with_its_generation() {
        let state = CsrfState::new();
        let empty = state.snapshot();
        assert_eq!(empty.generation, 0);
        assert!(empty.token.is_none());

        state.store(CsrfToken::new("one").unwrap());
        let held = state.snapshot();
        state.store(CsrfToken::new("two").unwrap());

        assert_eq!(held.generation, 1);
        assert_eq!(held.token.as_ref().unwrap().as_str(), "one");
        let now = state.snapshot();
        assert_eq!(now.generation, 2);
        assert_eq!(now.token.as_ref().unwrap().as_str(), "two");
    }

    #[test]
    fn test_states_are_independent() {
        let a = CsrfState::new();
        let b = CsrfState::new();
        a.store(CsrfToken::new("only-a").unwrap());
        assert!(b.current().is_none());
        assert_eq!(b.generation(), 0);
    }
}
