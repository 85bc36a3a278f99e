// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session record and lifecycle state machine.
//!
//! A session binds one workspace (git worktree on its own branch), one
//! terminal session (tmux), and one agent process under a unique name.
//! The record is what the registry persists; the state machine is what
//! every mutation is validated against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for an agent session.
    ///
    /// Immutable for the session's lifetime. Names can be reused after a
    /// session terminates; ids never are.
    pub struct SessionId;
}

/// Lifecycle state of a session.
///
/// Transitions run monotonically along
/// `Provisioning → Launching → Running → Stopping → Stopped`, with two
/// sanctioned shortcuts: any non-terminal state may fail directly to
/// `Failed`, and `Running` may be reconciled straight to `Stopped` when
/// the terminal session is observed gone out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Provisioning,
    Launching,
    Running,
    Stopping,
    Stopped,
    Failed,
}

impl SessionState {
    /// Terminal states free the session name for reuse.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Stopped | SessionState::Failed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        match (self, next) {
            (Provisioning, Launching) => true,
            (Launching, Running) => true,
            (Running, Stopping) => true,
            // Out-of-band kill observed by reconciliation
            (Running, Stopped) => true,
            (Stopping, Stopped) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Provisioning => "provisioning",
            SessionState::Launching => "launching",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
            SessionState::Stopped => "stopped",
            SessionState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A committed session record.
///
/// `workspace_path` and `terminal_id` are exclusively owned by this session
/// until teardown; the registry's reservation protocol guarantees no two
/// live records share either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    /// Human-visible handle, unique among non-terminal sessions.
    pub name: String,
    /// Agent kind identifier (e.g. "claude", "opencode").
    pub agent: String,
    /// Resolved invocation line typed into the pane.
    pub command: String,
    /// Initial task prompt delivered at launch.
    pub prompt: String,
    pub workspace_path: PathBuf,
    /// Git branch backing the workspace.
    pub branch: String,
    /// Namespaced tmux session name.
    pub terminal_id: String,
    pub state: SessionState,
    pub created_at_ms: u64,
    /// Updated on every successful `send`.
    pub last_activity_at_ms: u64,
}

impl Session {
    /// Age of the most recent activity, in milliseconds, relative to `now_ms`.
    pub fn activity_age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_activity_at_ms)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
