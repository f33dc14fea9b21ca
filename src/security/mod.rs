//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Proxied request:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → Forward to dev server
//!
//! Proxied response:
//!     → headers.rs (strip hop-by-hop)
//!     → Client
//! ```
//!
//! Request body size is capped by `tower-http`'s limit layer in the server.

pub mod headers;
