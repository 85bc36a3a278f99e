// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent launch sequence
//!
//! The agent is started by typing into its terminal session, not by exec:
//! interactive agents probe their tty and refuse to start under a pipe.
//! Delivery of the keystrokes is the success criterion; there is no
//! agent-side readiness signal to wait for.

use crate::env;
use crate::terminal::{TerminalBackend, TerminalError};
use std::time::Duration;
use thiserror::Error;

/// A launch that did not get its keystrokes into the pane.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("agent invocation was not delivered: {0}")]
    Invocation(#[source] TerminalError),
    #[error("task prompt was not delivered: {0}")]
    Prompt(#[source] TerminalError),
}

impl LaunchError {
    /// The terminal failure underneath, whichever phase it hit.
    pub fn terminal(&self) -> &TerminalError {
        match self {
            LaunchError::Invocation(err) | LaunchError::Prompt(err) => err,
        }
    }
}

/// Pacing between launch keystrokes. The invocation line needs the agent
/// process to own the pane before the prompt is typed; the prompt needs the
/// terminal to drain the paste before Enter.
#[derive(Debug, Clone, Copy)]
pub struct LaunchTiming {
    pub boot_settle: Duration,
    pub text_settle_base: Duration,
    pub text_settle_per_byte: Duration,
    pub text_settle_cap: Duration,
}

impl Default for LaunchTiming {
    fn default() -> Self {
        Self {
            boot_settle: env::boot_settle(),
            text_settle_base: Duration::from_millis(100),
            text_settle_per_byte: Duration::from_millis(1),
            text_settle_cap: Duration::from_secs(2),
        }
    }
}

impl LaunchTiming {
    /// Zero pacing for tests against fake backends.
    #[cfg(any(test, feature = "test-support"))]
    pub const NONE: Self = Self {
        boot_settle: Duration::ZERO,
        text_settle_base: Duration::ZERO,
        text_settle_per_byte: Duration::ZERO,
        text_settle_cap: Duration::ZERO,
    };

    fn text_settle(&self, bytes: usize) -> Duration {
        let scaled = self.text_settle_base + self.text_settle_per_byte * bytes as u32;
        scaled.min(self.text_settle_cap)
    }
}

/// Type the agent invocation line and the initial prompt into a terminal
/// session.
pub async fn launch_agent<T: TerminalBackend>(
    terminal: &T,
    terminal_id: &str,
    command: &str,
    prompt: &str,
    timing: LaunchTiming,
) -> Result<(), LaunchError> {
    terminal
        .send_text(terminal_id, command)
        .await
        .map_err(LaunchError::Invocation)?;
    terminal
        .send_enter(terminal_id)
        .await
        .map_err(LaunchError::Invocation)?;
    tokio::time::sleep(timing.boot_settle).await;

    terminal
        .send_text(terminal_id, prompt)
        .await
        .map_err(LaunchError::Prompt)?;
    tokio::time::sleep(timing.text_settle(prompt.len())).await;
    terminal
        .send_enter(terminal_id)
        .await
        .map_err(LaunchError::Prompt)?;

    Ok(())
}

#[cfg(test)]
#[path = "launch_tests.rs"]
mod tests;
