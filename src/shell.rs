//! External command execution for the open-repository step.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Capability to run an external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` with `args` and returns its exit code.
    ///
    /// `None` means the process ended without an exit code (killed by a
    /// signal).
    async fn run_external_command(
        &self,
        command: &Path,
        args: &[String],
    ) -> std::io::Result<Option<i32>>;
}

/// Runs commands as child processes sharing the caller's standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCommandRunner;

impl ProcessCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessCommandRunner {
    async fn run_external_command(
        &self,
        command: &Path,
        args: &[String],
    ) -> std::io::Result<Option<i32>> {
        debug!(command = %command.display(), ?args, "Running external command");

        let status = Command::new(command)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(status.code())
    }
}
