//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, env overrides)
//!     → validation.rs (semantic checks)
//!     → ClientConfig (validated, immutable)
//!     → moved into MarketClient at construction
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty file is a working config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::ClientConfig;
pub use schema::CsrfConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::RefreshPolicy;
pub use schema::ServerConfig;
pub use schema::TimeoutConfig;
