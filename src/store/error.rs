use thiserror::Error;

/// Errors surfaced by a [`BodyStore`](super::BodyStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No body document carries this `generals.name`.
    #[error("no body named {name:?}")]
    NotFound { name: String },

    /// No structure of this type carries this name.
    #[error("no {kind} named {name:?}")]
    StructureNotFound { kind: String, name: String },

    /// The value has no BSON representation (integers beyond `i64`).
    #[error("unsupported value: {0}")]
    InvalidValue(String),

    /// The addressed field cannot be created inside the existing document.
    #[error("cannot set {0}")]
    InvalidPath(String),

    /// Connectivity, query or decode failure from the database.
    #[error("{0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(value: mongodb::error::Error) -> Self {
        StoreError::Backend(value.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(value: mongodb::bson::ser::Error) -> Self {
        StoreError::InvalidValue(value.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
