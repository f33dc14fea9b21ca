//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route table)
//!         → matched: REST handler
//!         → GET/HEAD elsewhere: root target
//!             → redirect.rs says redirecting → proxy
//!             → otherwise, static dir configured → static files
//!         → PUT/POST elsewhere: 400
//!         → anything else: 405
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input and flag value always pick the same target

pub mod redirect;
pub mod router;

pub use redirect::RedirectFlag;
pub use router::build_routes;
