//! Error responses.
//!
//! # Design Decisions
//! - Bodies are plain text, matching what the frontend already parses
//! - Store failures keep their raw text so the client sees the cause
//! - Upstream transport failures become 502 Bad Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed client input; the store was never touched.
    #[error("{0}")]
    BadRequest(String),

    #[error("request body too large")]
    PayloadTooLarge,

    /// Any store failure. A missing body is a 500; a missing structure is a
    /// 404 and a value BSON cannot hold is a 400.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The dev server could not be reached.
    #[error("{0}")]
    UpstreamUnavailable(String),

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Store(StoreError::StructureNotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::InvalidValue(_)) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
