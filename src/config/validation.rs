//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Catch a proxy pointed back at the server itself
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be 0")]
    ZeroPort(&'static str),

    #[error("react_port {0} equals http_port; the proxy would forward to itself")]
    ProxyLoop(u16),

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("mongo_url must start with mongodb:// or mongodb+srv://, got {0:?}")]
    MongoScheme(String),

    #[error("{0} must be greater than 0")]
    ZeroDuration(&'static str),

    #[error("server.max_body_size must be greater than 0")]
    ZeroBodyLimit,

    #[error("frontend.command must name a program when frontend.enabled is true")]
    EmptyFrontendCommand,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.http_port == 0 {
        errors.push(ValidationError::ZeroPort("http_port"));
    }
    if config.react_port == 0 {
        errors.push(ValidationError::ZeroPort("react_port"));
    } else if config.react_port == config.http_port {
        errors.push(ValidationError::ProxyLoop(config.react_port));
    }

    let mongo_url = config.mongo_url.trim();
    if mongo_url.is_empty() {
        errors.push(ValidationError::Empty("mongo_url"));
    } else if !mongo_url.starts_with("mongodb://") && !mongo_url.starts_with("mongodb+srv://") {
        errors.push(ValidationError::MongoScheme(config.mongo_url.clone()));
    }

    if config.mongo_db_name.trim().is_empty() {
        errors.push(ValidationError::Empty("mongo_db_name"));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroDuration("server.request_timeout_secs"));
    }
    if config.server.shutdown_grace_secs == 0 {
        errors.push(ValidationError::ZeroDuration("server.shutdown_grace_secs"));
    }
    if config.server.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let program = config.frontend.command.first().map(|p| p.trim());
    if config.frontend.enabled && program.map_or(true, str::is_empty) {
        errors.push(ValidationError::EmptyFrontendCommand);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
