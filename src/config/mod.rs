//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, path given on the command line)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → redirect flag updated, everything else kept
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the redirect flag is live
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, FrontendConfig, ObservabilityConfig, ServerConfig};
