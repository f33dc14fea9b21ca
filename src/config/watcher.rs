//! Configuration file watcher for hot reload.
//!
//! Only `redirect_to_react` is applied live. Every other setting is bound at
//! startup (listener, store connection, frontend process) and needs a restart.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::AppConfig;
use crate::routing::RedirectFlag;

/// Quiet period that closes a burst of file events.
const SETTLE: Duration = Duration::from_millis(250);

/// Watches the config file and emits one reloaded config per burst of edits.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Must be called inside a Tokio runtime; the returned
    /// handle stops the watch when dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_content_change(&event.kind) => {
                    let _ = change_tx.send(());
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %self.path.display(), "Config watcher started");
        tokio::spawn(settle_and_reload(change_rx, self.path, self.update_tx));
        Ok(watcher)
    }
}

/// Writes and (re)creations; metadata-only changes and reads are ignored.
fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

async fn settle_and_reload(
    mut changes: mpsc::UnboundedReceiver<()>,
    path: PathBuf,
    updates: mpsc::UnboundedSender<AppConfig>,
) {
    while changes.recv().await.is_some() {
        while let Ok(Some(())) = tokio::time::timeout(SETTLE, changes.recv()).await {}

        match load_config(&path) {
            Ok(config) => {
                tracing::info!("Config file reloaded");
                if updates.send(config).is_err() {
                    return;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
            }
        }
    }
}

/// Apply reloaded configurations until the sender side closes.
///
/// This task is the only writer of the redirect flag.
pub async fn apply_updates(
    mut updates: mpsc::UnboundedReceiver<AppConfig>,
    current: AppConfig,
    flag: RedirectFlag,
) {
    while let Some(next) = updates.recv().await {
        let previous = flag.set(next.redirect_to_react);
        if previous != next.redirect_to_react {
            tracing::info!(
                redirect_to_react = next.redirect_to_react,
                "Root target switched"
            );
        }

        if next.http_port != current.http_port
            || next.static_dir != current.static_dir
            || next.react_port != current.react_port
            || next.mongo_url != current.mongo_url
            || next.mongo_db_name != current.mongo_db_name
        {
            tracing::warn!("Only redirect_to_react is applied live; restart to apply other changes");
        }
    }
}
