//! Configuration schema definitions.
//!
//! The six top-level keys mirror the JSON file the frontend tooling already
//! writes; the nested blocks are optional and fully defaulted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration for the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Port the HTTP server listens on (all interfaces).
    pub http_port: u16,

    /// Directory holding the built frontend. Empty disables static serving.
    pub static_dir: String,

    /// Port of the frontend dev server on localhost.
    pub react_port: u16,

    /// Forward root requests to the dev server instead of serving `static_dir`.
    pub redirect_to_react: bool,

    /// MongoDB connection URI.
    pub mongo_url: String,

    /// Database holding the `anatom-struct` and `body` collections.
    pub mongo_db_name: String,

    /// HTTP server tuning.
    pub server: ServerConfig,

    /// Frontend dev-server process.
    pub frontend: FrontendConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            static_dir: String::new(),
            react_port: 5173,
            redirect_to_react: true,
            mongo_url: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "anatom".to_string(),
            server: ServerConfig::default(),
            frontend: FrontendConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// Static asset root, if one is configured.
    pub fn static_root(&self) -> Option<&Path> {
        let trimmed = self.static_dir.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Path::new(trimmed))
        }
    }

    /// Origin of the frontend dev server.
    pub fn upstream_origin(&self) -> String {
        format!("localhost:{}", self.react_port)
    }
}

/// HTTP server tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Request timeout (time to produce response headers) in seconds.
    pub request_timeout_secs: u64,

    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_grace_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Reload `redirect_to_react` when the config file changes.
    pub watch_config: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            shutdown_grace_secs: 5,
            max_body_size: 2 * 1024 * 1024, // 2MB
            watch_config: true,
        }
    }
}

/// Frontend dev-server process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Start the dev server alongside the backend.
    pub enabled: bool,

    /// Program and arguments.
    pub command: Vec<String>,

    /// Working directory; the backend's own when unset.
    pub working_dir: Option<PathBuf>,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: vec!["npm".to_string(), "run".to_string(), "dev".to_string()],
            working_dir: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Prometheus exporter bind address. No exporter when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
