// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tmux terminal backend

use super::{TerminalBackend, TerminalError};
use crate::subprocess::{run_with_timeout, TMUX_TIMEOUT};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

/// Prefix for tmux sessions owned by this tool.
pub const SESSION_PREFIX: &str = "winow-";

/// Tmux-based terminal backend
#[derive(Clone, Default)]
pub struct TmuxBackend;

impl TmuxBackend {
    pub fn new() -> Self {
        Self
    }

    /// Verify the tmux binary answers at all.
    pub async fn probe(&self) -> Result<(), TerminalError> {
        let mut cmd = Command::new("tmux");
        cmd.arg("-V");
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux -V").await?;
        if !output.status.success() {
            return Err(TerminalError::Unreachable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    /// Foreground attach: hands the controlling terminal to tmux until the
    /// operator detaches or the session ends. Returns tmux's exit code.
    pub async fn attach(&self, id: &str) -> Result<i32, TerminalError> {
        let status = Command::new("tmux")
            .args(["attach-session", "-t", &exact(id)])
            .status()
            .await
            .map_err(|e| TerminalError::Unreachable(format!("tmux attach-session failed: {e}")))?;
        Ok(status.code().unwrap_or(1))
    }
}

/// Exact-match target. Bare `-t` prefix-matches, which would conflate
/// `winow-fix-bug` with `winow-fix-bug-2`.
fn exact(id: &str) -> String {
    format!("={id}")
}

#[async_trait]
impl TerminalBackend for TmuxBackend {
    async fn create(&self, name: &str, cwd: &Path) -> Result<String, TerminalError> {
        // Precondition: cwd must exist
        if !cwd.exists() {
            return Err(TerminalError::CreateFailed(format!(
                "working directory does not exist: {}",
                cwd.display()
            )));
        }

        let id = format!("{SESSION_PREFIX}{name}");

        // A leftover session with this id belongs to a crashed run whose
        // registry entry is already terminal; replace it.
        let mut check = Command::new("tmux");
        check.args(["has-session", "-t", &exact(&id)]);
        let leftover = run_with_timeout(check, TMUX_TIMEOUT, "tmux has-session").await;
        if leftover.map(|o| o.status.success()).unwrap_or(false) {
            tracing::warn!(id, "replacing leftover terminal session");
            let mut kill = Command::new("tmux");
            kill.args(["kill-session", "-t", &exact(&id)]);
            let _ = run_with_timeout(kill, TMUX_TIMEOUT, "tmux kill-session").await;
        }

        // No command argument: the session runs the default shell and the
        // agent is typed in afterwards, so it sees a real interactive
        // environment.
        let mut cmd = Command::new("tmux");
        cmd.args(["new-session", "-d", "-s", &id, "-c"]).arg(cwd);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux new-session").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(id, stderr = %stderr, "tmux new-session failed");
            return Err(TerminalError::CreateFailed(stderr.trim().to_string()));
        }

        Ok(id)
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), TerminalError> {
        // -l = literal mode (no key name interpretation)
        // -- = end of options (handles text starting with -)
        tmux_run(
            &["send-keys", "-t", &exact(id), "-l", "--", text],
            "tmux send-keys literal",
        )
        .await
    }

    async fn send_enter(&self, id: &str) -> Result<(), TerminalError> {
        tmux_run(&["send-keys", "-t", &exact(id), "Enter"], "tmux send-keys enter").await
    }

    async fn is_alive(&self, id: &str) -> Result<bool, TerminalError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["has-session", "-t", &exact(id)]);
        // Non-zero covers both a missing session and a stopped server;
        // either way the session is definitively gone.
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux has-session").await?;
        Ok(output.status.success())
    }

    async fn list_sessions(&self) -> Result<Vec<String>, TerminalError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["list-sessions", "-F", "#{session_name}"]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux list-sessions").await?;
        if !output.status.success() {
            // No server running means no sessions.
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| line.starts_with(SESSION_PREFIX))
            .map(str::to_string)
            .collect())
    }

    async fn kill(&self, id: &str) -> Result<(), TerminalError> {
        let mut cmd = Command::new("tmux");
        cmd.args(["kill-session", "-t", &exact(id)]);
        let output = run_with_timeout(cmd, TMUX_TIMEOUT, "tmux kill-session").await?;
        if !output.status.success() {
            // Already dead, which is what the caller wanted.
            tracing::debug!(id, "kill-session target already absent");
        }
        Ok(())
    }

    async fn capture(&self, id: &str, lines: u32) -> Result<String, TerminalError> {
        let start = format!("-{lines}");
        let output = tmux_output(
            &["capture-pane", "-t", &exact(id), "-p", "-S", &start],
            "tmux capture-pane",
        )
        .await?;
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Run a tmux command addressed at a session (discards output).
async fn tmux_run(args: &[&str], context: &str) -> Result<(), TerminalError> {
    tmux_output(args, context).await.map(|_| ())
}

/// Run a tmux command addressed at a session and return its output. A
/// non-zero exit means the session is gone.
async fn tmux_output(args: &[&str], context: &str) -> Result<std::process::Output, TerminalError> {
    let mut cmd = Command::new("tmux");
    cmd.args(args);
    let output = run_with_timeout(cmd, TMUX_TIMEOUT, context).await?;
    if !output.status.success() {
        let id = args
            .windows(2)
            .find(|w| w[0] == "-t")
            .map(|w| w[1].trim_start_matches('='))
            .unwrap_or("unknown");
        return Err(TerminalError::NotFound(id.to_string()));
    }
    Ok(output)
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
