// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal multiplexer backends

mod tmux;

pub use tmux::{TmuxBackend, SESSION_PREFIX};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTerminalBackend, FakeTerminalSession, TerminalCall};

use crate::subprocess::ExecError;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from terminal session operations
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal session not found: {0}")]
    NotFound(String),
    #[error("could not create terminal session: {0}")]
    CreateFailed(String),
    #[error("terminal multiplexer unreachable: {0}")]
    Unreachable(String),
}

impl From<ExecError> for TerminalError {
    fn from(err: ExecError) -> Self {
        TerminalError::Unreachable(err.to_string())
    }
}

/// Backend for persistent terminal sessions.
///
/// Sessions outlive the CLI process; ids are namespaced so multiplexer
/// sessions created outside this tool are never touched. A missing session
/// is a definitive answer (`false`, `NotFound`); only failing to get an
/// answer at all is `Unreachable`.
#[async_trait]
pub trait TerminalBackend: Clone + Send + Sync + 'static {
    /// Create a detached session for `name` with its shell started in
    /// `cwd`. Returns the namespaced terminal session id.
    async fn create(&self, name: &str, cwd: &Path) -> Result<String, TerminalError>;

    /// Type literal text into the session's active pane. Safe to call while
    /// an operator is attached.
    async fn send_text(&self, id: &str, text: &str) -> Result<(), TerminalError>;

    /// Press Enter in the session's active pane.
    async fn send_enter(&self, id: &str) -> Result<(), TerminalError>;

    /// Whether the session currently exists.
    async fn is_alive(&self, id: &str) -> Result<bool, TerminalError>;

    /// Ids of all live sessions created by this tool.
    async fn list_sessions(&self) -> Result<Vec<String>, TerminalError>;

    /// Kill a session. Killing an already-dead session is not an error.
    async fn kill(&self, id: &str) -> Result<(), TerminalError>;

    /// Capture the last `lines` lines of pane output.
    async fn capture(&self, id: &str, lines: u32) -> Result<String, TerminalError>;
}
