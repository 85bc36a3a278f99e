// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! winow-backends: external process backends
//!
//! Workspaces are git worktrees and terminal sessions are tmux sessions;
//! both live behind small capability traits so the orchestration logic can
//! be exercised against in-memory fakes.

mod env;
pub mod launch;
pub mod subprocess;
pub mod terminal;
pub mod workspace;

pub use launch::{launch_agent, LaunchError, LaunchTiming};
pub use subprocess::{run_with_timeout, ExecError, GIT_TIMEOUT, TMUX_TIMEOUT};
pub use terminal::{TerminalBackend, TerminalError, TmuxBackend, SESSION_PREFIX};
pub use workspace::{
    GitBackend, ProvisionedWorkspace, WorkspaceBackend, WorkspaceError, BRANCH_PREFIX,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use terminal::{FakeTerminalBackend, FakeTerminalSession, TerminalCall};
#[cfg(any(test, feature = "test-support"))]
pub use workspace::{FakeWorkspaceBackend, WorkspaceCall};
