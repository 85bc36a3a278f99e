// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory fake workspace backend for orchestration tests

#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProvisionedWorkspace, WorkspaceBackend, WorkspaceError, BRANCH_PREFIX};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Virtual directory the fake roots its workspace paths under.
const FAKE_WORKSPACES_DIR: &str = "/fake/workspaces";

/// A recorded call against the fake backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceCall {
    Provision {
        name: String,
    },
    Teardown {
        path: PathBuf,
        branch: String,
        delete_branch: bool,
    },
}

#[derive(Default)]
struct State {
    /// Live worktrees: path -> branch.
    worktrees: HashMap<PathBuf, String>,
    branches: HashSet<String>,
    dirty: HashSet<PathBuf>,
    preexisting: HashSet<PathBuf>,
    calls: Vec<WorkspaceCall>,
    unreachable: bool,
    provision_error: Option<String>,
}

/// Records every call and simulates worktree/branch bookkeeping without
/// touching the filesystem.
#[derive(Clone, Default)]
pub struct FakeWorkspaceBackend {
    state: Arc<Mutex<State>>,
}

impl FakeWorkspaceBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WorkspaceCall> {
        self.state.lock().calls.clone()
    }

    /// Live `(path, branch)` pairs, sorted by path.
    pub fn worktrees(&self) -> Vec<(PathBuf, String)> {
        let state = self.state.lock();
        let mut pairs: Vec<_> = state
            .worktrees
            .iter()
            .map(|(p, b)| (p.clone(), b.clone()))
            .collect();
        pairs.sort();
        pairs
    }

    pub fn has_worktree(&self, path: &Path) -> bool {
        self.state.lock().worktrees.contains_key(path)
    }

    pub fn has_branch(&self, branch: &str) -> bool {
        self.state.lock().branches.contains(branch)
    }

    /// Pre-register a branch so the next provision for its name must
    /// disambiguate.
    pub fn add_branch(&self, branch: &str) {
        self.state.lock().branches.insert(branch.to_string());
    }

    /// Pre-register a path as occupied by something that is not a live
    /// worktree.
    pub fn add_existing_path(&self, path: &Path) {
        self.state.lock().preexisting.insert(path.to_path_buf());
    }

    /// Mark a worktree as holding uncommitted changes; teardown will refuse
    /// to remove it.
    pub fn mark_dirty(&self, path: &Path) {
        self.state.lock().dirty.insert(path.to_path_buf());
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Fail the next provision with a git error carrying `detail`.
    pub fn fail_next_provision(&self, detail: &str) {
        self.state.lock().provision_error = Some(detail.to_string());
    }

    fn check_reachable(&self) -> Result<(), WorkspaceError> {
        if self.state.lock().unreachable {
            return Err(WorkspaceError::Unreachable(
                "git did not answer".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkspaceBackend for FakeWorkspaceBackend {
    async fn provision(&self, name: &str) -> Result<ProvisionedWorkspace, WorkspaceError> {
        self.state.lock().calls.push(WorkspaceCall::Provision {
            name: name.to_string(),
        });
        self.check_reachable()?;

        let mut state = self.state.lock();
        if let Some(detail) = state.provision_error.take() {
            return Err(WorkspaceError::GitFailed {
                op: "worktree add".to_string(),
                detail,
            });
        }

        let path = Path::new(FAKE_WORKSPACES_DIR).join(name);
        if state.worktrees.contains_key(&path) || state.preexisting.contains(&path) {
            return Err(WorkspaceError::PathExists(path));
        }

        let mut branch = format!("{BRANCH_PREFIX}{name}");
        let mut n = 2u32;
        while state.branches.contains(&branch) {
            branch = format!("{BRANCH_PREFIX}{name}-{n}");
            n += 1;
        }

        state.worktrees.insert(path.clone(), branch.clone());
        state.branches.insert(branch.clone());
        Ok(ProvisionedWorkspace { path, branch })
    }

    async fn teardown(
        &self,
        path: &Path,
        branch: &str,
        delete_branch: bool,
    ) -> Result<(), WorkspaceError> {
        self.state.lock().calls.push(WorkspaceCall::Teardown {
            path: path.to_path_buf(),
            branch: branch.to_string(),
            delete_branch,
        });
        self.check_reachable()?;

        let mut state = self.state.lock();
        if state.dirty.contains(path) {
            return Err(WorkspaceError::GitFailed {
                op: "worktree remove".to_string(),
                detail: format!("'{}' contains modified or untracked files", path.display()),
            });
        }
        // A missing path counts as removed.
        state.worktrees.remove(path);
        if delete_branch {
            // Deleting a missing branch is logged, never fatal.
            state.branches.remove(branch);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
