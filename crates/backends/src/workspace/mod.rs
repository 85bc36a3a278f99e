// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace provisioning backends

mod git;

pub use git::GitBackend;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeWorkspaceBackend, WorkspaceCall};

use crate::subprocess::ExecError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Branch namespace for session branches, mirroring the terminal session
/// prefix so `git branch` output reads as tool-owned.
pub const BRANCH_PREFIX: &str = "winow/";

/// Errors from workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace path already exists: {}", .0.display())]
    PathExists(PathBuf),
    #[error("not inside a git repository")]
    NotARepository,
    #[error("git {op} failed: {detail}")]
    GitFailed { op: String, detail: String },
    #[error("could not prepare {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("version control unreachable: {0}")]
    Unreachable(String),
}

impl From<ExecError> for WorkspaceError {
    fn from(err: ExecError) -> Self {
        WorkspaceError::Unreachable(err.to_string())
    }
}

/// A freshly created working copy and the branch backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedWorkspace {
    pub path: PathBuf,
    /// Derived from the session name; carries a numeric suffix when the
    /// plain candidate already existed as a branch.
    pub branch: String,
}

/// Backend for branch-scoped working copies.
#[async_trait]
pub trait WorkspaceBackend: Clone + Send + Sync + 'static {
    /// Create a working copy for session `name` on its own new branch.
    ///
    /// The target path derives from `name`; an existing path signals a
    /// prior incomplete teardown and fails the call.
    async fn provision(&self, name: &str) -> Result<ProvisionedWorkspace, WorkspaceError>;

    /// Remove the working copy at `path`, and `branch` with it when
    /// `delete_branch` is set.
    ///
    /// A path that is already gone counts as removed. Uncommitted work is
    /// refused, not discarded. Branch deletion failures are logged, never
    /// returned.
    async fn teardown(
        &self,
        path: &Path,
        branch: &str,
        delete_branch: bool,
    ) -> Result<(), WorkspaceError>;
}
