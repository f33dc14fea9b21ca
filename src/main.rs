//! anatom-server
//!
//! ```text
//!     Browser ──▶ HTTP server ──┬─▶ /bones, /bodies, /body/...  ──▶ MongoDB
//!                               │
//!                               └─▶ everything else ──┬─▶ static_dir
//!                                                     └─▶ frontend dev server
//! ```
//!
//! Startup: config → logging → metrics → store → watcher → listener → frontend.
//! Shutdown: frontend → HTTP drain (bounded) → store.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use anatom_server::config::watcher::{apply_updates, ConfigWatcher};
use anatom_server::config::{load_config, AppConfig};
use anatom_server::frontend::FrontendProcess;
use anatom_server::lifecycle::{drain, shutdown_signal, Shutdown};
use anatom_server::observability::{logging, metrics};
use anatom_server::store::{BodyStore, MongoStore};
use anatom_server::{HttpServer, RedirectFlag};

#[derive(Parser)]
#[command(name = "anatom-server")]
#[command(about = "Body/bone API and frontend gateway", long_about = None)]
struct Cli {
    /// Path to the JSON configuration file.
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(path) = cli.config else {
        logging::init("info");
        tracing::error!("Usage: anatom-server <config.json>");
        return ExitCode::FAILURE;
    };

    let config = match load_config(&path) {
        Ok(config) => config,
        Err(err) => {
            logging::init("info");
            tracing::error!(path = %path.display(), error = %err, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        path = %path.display(),
        "anatom-server starting"
    );

    match run(path, config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: PathBuf, config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?)?;
    }

    let store: Arc<dyn BodyStore> =
        Arc::new(MongoStore::connect(&config.mongo_url, &config.mongo_db_name).await?);

    let redirect = RedirectFlag::new(config.redirect_to_react);

    // Dropping the watcher stops notifications, so it lives until shutdown.
    let _watcher = if config.server.watch_config {
        let (watcher, updates) = ConfigWatcher::new(&path);
        let handle = watcher.run()?;
        tokio::spawn(apply_updates(updates, config.clone(), redirect.clone()));
        Some(handle)
    } else {
        None
    };

    let listener = TcpListener::bind(("0.0.0.0", config.http_port)).await?;
    let grace = Duration::from_secs(config.server.shutdown_grace_secs);

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config.clone(), store.clone(), redirect);
    let serve = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let mut frontend = if config.frontend.enabled {
        match FrontendProcess::start(&config.frontend) {
            Ok(process) => Some(process),
            Err(err) => {
                shutdown.trigger();
                drain(serve, grace).await;
                store.close().await?;
                return Err(err.into());
            }
        }
    } else {
        tracing::info!("Frontend process disabled");
        None
    };

    shutdown_signal().await;
    tracing::info!("Shutting down");

    if let Some(process) = frontend.as_mut() {
        if let Err(err) = process.stop().await {
            tracing::error!(error = %err, "Failed to stop frontend");
        }
    }

    shutdown.trigger();
    drain(serve, grace).await;

    store.close().await?;
    Ok(())
}
