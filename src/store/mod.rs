//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler (validated input)
//!     → BodyStore trait
//!         → mongo.rs  (MongoDB driver, production)
//!         → memory.rs (in-process, tests and local runs)
//!     → Document (JSON object) or StoreError
//! ```
//!
//! # Design Decisions
//! - Documents are untyped JSON objects; no schema is imposed
//! - Updates are targeted `$set`s, never read-modify-write
//! - An update that matches no body is `NotFound`; one that matches but
//!   changes nothing (same value written twice) succeeds
//! - No retries, no backoff, no multi-document transactions

pub mod breadcrumb;
pub mod document;
pub mod error;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use breadcrumb::{Breadcrumb, BreadcrumbError};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// A stored document, as returned to clients.
pub type Document = Map<String, Value>;

/// Collection holding anatomical structures.
pub const STRUCTURES_COLLECTION: &str = "anatom-struct";

/// Collection holding body documents.
pub const BODIES_COLLECTION: &str = "body";

/// Field every body document is keyed by.
pub const BODY_NAME_FIELD: &str = "generals.name";

/// Fields kept when listing structures of one type.
pub const STRUCTURE_SUMMARY_FIELDS: [&str; 3] = ["_id", "type", "name"];

/// Fields kept when listing bodies.
pub const BODY_SUMMARY_FIELDS: [&str; 3] = ["_id", "generals", "updatedAt"];

/// Typed operations over the structures and bodies collections.
#[async_trait]
pub trait BodyStore: Send + Sync {
    /// All structures whose `type` is `"bone"`, in cursor order.
    async fn list_bones(&self) -> StoreResult<Vec<Document>>;

    /// Structures of type `kind`, projected to [`STRUCTURE_SUMMARY_FIELDS`].
    async fn list_structures(&self, kind: &str) -> StoreResult<Vec<Document>>;

    /// The structure of type `kind` named `name`.
    async fn get_structure(&self, kind: &str, name: &str) -> StoreResult<Document>;

    /// Every body, projected to [`BODY_SUMMARY_FIELDS`].
    async fn list_bodies(&self) -> StoreResult<Vec<Document>>;

    /// The body whose `generals.name` equals `name`.
    async fn get_body(&self, name: &str) -> StoreResult<Document>;

    /// Replace the body's `skeleton` field.
    async fn update_body_skeleton(&self, name: &str, skeleton: Value) -> StoreResult<()>;

    /// Replace the body's whole `bones` tree.
    async fn update_body_bones(&self, name: &str, bones: Value) -> StoreResult<()>;

    /// Set the single field addressed by `breadcrumb`, leaving siblings intact.
    async fn update_body_bone(
        &self,
        name: &str,
        breadcrumb: &Breadcrumb,
        value: Value,
    ) -> StoreResult<()>;

    /// Release the connection.
    async fn close(&self) -> StoreResult<()>;
}
