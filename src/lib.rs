//! Backend for the anatomical reference app.
//!
//! Serves body and bone documents out of MongoDB, and fronts the frontend
//! either from a static build or by proxying its dev server.

pub mod config;
pub mod frontend;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RedirectFlag;
pub use store::{BodyStore, MemoryStore, MongoStore};
