//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! MarketClient dispatch / refresh / replay
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//! ```
//!
//! # Design Decisions
//! - Every request carries an `X-Request-ID`; log events include it
//! - Token values never appear in logs

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
