//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → routing (route table)
//!         → handlers.rs (REST over the store, extract.rs validates input)
//!         → static files or proxy.rs / websocket.rs (dev server)
//!     → response.rs (error mapping)
//!     → Send to client
//! ```

pub mod extract;
pub mod handlers;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;
pub mod websocket;

pub use proxy::UpstreamProxy;
pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
