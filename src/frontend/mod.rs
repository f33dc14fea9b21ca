//! Frontend dev-server lifecycle.
//!
//! # Data Flow
//! ```text
//! Startup:  store connected → router built → process.rs start → serve
//! Shutdown: signal → process.rs stop → HTTP drain → store close
//! ```

pub mod process;

pub use process::{FrontendProcess, ProcessError};
