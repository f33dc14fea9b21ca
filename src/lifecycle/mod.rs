//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main wakes up
//!
//! Shutdown (shutdown.rs):
//!     Stop frontend → Trigger broadcast → Drain HTTP (bounded) → Close store
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: the dev server goes first, the store last
//! - The HTTP drain has a deadline; the serve task is aborted past it

pub mod shutdown;
pub mod signals;

pub use shutdown::{drain, DrainOutcome, Shutdown};
pub use signals::shutdown_signal;
