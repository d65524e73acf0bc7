//! Retry-once logic for stale anti-forgery tokens.
//!
//! # Responsibilities
//! - Classify which responses are recoverable (403 only)
//! - Track which attempt a request is on
//!
//! # State Transitions
//! ```text
//! Original --403--> [refresh token] --> Replay --any--> done
//! Original --other--> done
//! ```
//!
//! A replay is never recovered, so a second 403 is surfaced to the caller.

use reqwest::StatusCode;

/// Status the backend returns for a missing or stale CSRF token.
pub const CSRF_REJECTION: StatusCode = StatusCode::FORBIDDEN;

/// Whether a status means "refresh the token and try again".
pub fn is_csrf_rejection(status: StatusCode) -> bool {
    status == CSRF_REJECTION
}

/// Which attempt of a logical request is being dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Original,
    Replay,
}

impl Attempt {
    /// Whether a response with `status` on this attempt triggers refresh + replay.
    pub fn should_recover(self, status: StatusCode) -> bool {
        self == Attempt::Original && is_csrf_rejection(status)
    }

    /// The attempt that follows this one, if any.
    pub fn next(self) -> Option<Attempt> {
        match self {
            Attempt::Original => Some(Attempt::Replay),
            Attempt::Replay => None,
        }
    }

    pub fn is_replay(self) -> bool {
        self == Attempt::Replay
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attempt::Original => "original",
            Attempt::Replay => "replay",
        }
    }
}
