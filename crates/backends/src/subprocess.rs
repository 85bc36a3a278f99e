// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess execution helpers

use std::process::Output;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Default timeout for tmux commands.
pub const TMUX_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for git worktree operations.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure to get an answer from a subprocess at all.
///
/// A command that ran and exited non-zero is not an `ExecError`; callers
/// read that from the returned [`Output`]. The timeout variant is what
/// separates "backend unreachable" from a definitive answer.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("{context} failed: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{context} timed out after {}s", .timeout.as_secs())]
    Timeout { context: String, timeout: Duration },
}

impl ExecError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }
}

/// Run a subprocess command with a timeout.
///
/// Wraps `Command::output()` with `tokio::time::timeout`. The child is
/// killed when the timeout elapses so it cannot outlive the caller's
/// budget.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    context: &str,
) -> Result<Output, ExecError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(ExecError::Io {
            context: context.to_string(),
            source,
        }),
        Err(_elapsed) => Err(ExecError::Timeout {
            context: context.to_string(),
            timeout,
        }),
    }
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
