//! Shutdown coordination.

use std::io;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How the serve task ended.
#[derive(Debug)]
pub enum DrainOutcome {
    Completed,
    Failed(String),
    TimedOut,
}

/// Wait up to `grace` for the serve task, aborting it past the deadline.
pub async fn drain(mut task: JoinHandle<io::Result<()>>, grace: Duration) -> DrainOutcome {
    let outcome = match tokio::time::timeout(grace, &mut task).await {
        Ok(Ok(Ok(()))) => DrainOutcome::Completed,
        Ok(Ok(Err(err))) => DrainOutcome::Failed(err.to_string()),
        Ok(Err(join)) => DrainOutcome::Failed(join.to_string()),
        Err(_) => {
            task.abort();
            DrainOutcome::TimedOut
        }
    };

    match &outcome {
        DrainOutcome::Completed => tracing::info!("HTTP server drained"),
        DrainOutcome::Failed(reason) => tracing::error!(%reason, "HTTP server exited with error"),
        DrainOutcome::TimedOut => {
            tracing::warn!(grace_secs = grace.as_secs(), "HTTP drain timed out, aborting")
        }
    }
    outcome
}
