//! Frontend dev-server process.
//!
//! Start, stop and poll only. A crash is not detected or restarted; the
//! proxy keeps answering 502 until someone restarts the process.

use std::process::Stdio;

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::config::FrontendConfig;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("frontend command is empty")]
    EmptyCommand,

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to stop frontend process: {0}")]
    Kill(#[source] std::io::Error),
}

/// Handle to a running (or finished) dev server.
#[derive(Debug)]
pub struct FrontendProcess {
    program: String,
    child: Option<Child>,
}

impl FrontendProcess {
    /// Spawn the configured command with inherited stdio.
    pub fn start(config: &FrontendConfig) -> Result<Self, ProcessError> {
        let (program, args) = config
            .command
            .split_first()
            .filter(|(program, _)| !program.trim().is_empty())
            .ok_or(ProcessError::EmptyCommand)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ProcessError::Spawn {
            program: program.clone(),
            source,
        })?;

        tracing::info!(program = %program, pid = ?child.id(), "Frontend started");
        Ok(Self {
            program: program.clone(),
            child: Some(child),
        })
    }

    /// Whether the process has not exited yet.
    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Kill and reap the process. Calling it again is a no-op.
    pub async fn stop(&mut self) -> Result<(), ProcessError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        if let Ok(Some(status)) = child.try_wait() {
            tracing::info!(program = %self.program, %status, "Frontend already exited");
            return Ok(());
        }

        child.kill().await.map_err(ProcessError::Kill)?;
        tracing::info!(program = %self.program, "Frontend stopped");
        Ok(())
    }
}
