// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git worktree workspace backend

use super::{ProvisionedWorkspace, WorkspaceBackend, WorkspaceError, BRANCH_PREFIX};
use crate::subprocess::{run_with_timeout, GIT_TIMEOUT};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error, warn};

/// Git-worktree-based workspace backend. Every command runs against the
/// repository the tool was invoked from.
#[derive(Debug, Clone)]
pub struct GitBackend {
    repo_root: PathBuf,
    workspaces_dir: PathBuf,
    base_ref: String,
}

impl GitBackend {
    pub fn new(
        repo_root: impl Into<PathBuf>,
        workspaces_dir: impl Into<PathBuf>,
        base_ref: impl Into<String>,
    ) -> Self {
        Self {
            repo_root: repo_root.into(),
            workspaces_dir: workspaces_dir.into(),
            base_ref: base_ref.into(),
        }
    }

    /// Resolve the top-level directory of the repository containing `cwd`.
    ///
    /// `GIT_DIR`/`GIT_WORK_TREE` are scrubbed so the answer reflects where
    /// the tool was invoked, not where the operator's environment points.
    pub async fn discover_repo_root(cwd: &Path) -> Result<PathBuf, WorkspaceError> {
        let mut cmd = Command::new("git");
        cmd.current_dir(cwd)
            .args(["rev-parse", "--show-toplevel"])
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE");
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git rev-parse --show-toplevel").await?;
        if !output.status.success() {
            return Err(WorkspaceError::NotARepository);
        }
        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(PathBuf::from(root))
    }

    /// Verify the git binary answers at all.
    pub async fn probe() -> Result<(), WorkspaceError> {
        let mut cmd = Command::new("git");
        cmd.arg("--version");
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git --version").await?;
        if !output.status.success() {
            return Err(WorkspaceError::Unreachable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new("git");
        cmd.current_dir(&self.repo_root);
        cmd
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool, WorkspaceError> {
        let mut cmd = self.git();
        cmd.args(["rev-parse", "--verify", "--quiet"])
            .arg(format!("refs/heads/{branch}"));
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git rev-parse --verify").await?;
        Ok(output.status.success())
    }

    /// First free branch name for `name`: the plain candidate, then `-2`,
    /// `-3`, ... past branches left behind by earlier sessions.
    async fn free_branch(&self, name: &str) -> Result<String, WorkspaceError> {
        let candidate = format!("{BRANCH_PREFIX}{name}");
        if !self.branch_exists(&candidate).await? {
            return Ok(candidate);
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{BRANCH_PREFIX}{name}-{n}");
            if !self.branch_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait]
impl WorkspaceBackend for GitBackend {
    async fn provision(&self, name: &str) -> Result<ProvisionedWorkspace, WorkspaceError> {
        let path = self.workspaces_dir.join(name);
        // An existing path signals an earlier incomplete teardown; never
        // build on top of it.
        if path.exists() {
            return Err(WorkspaceError::PathExists(path));
        }
        tokio::fs::create_dir_all(&self.workspaces_dir)
            .await
            .map_err(|source| WorkspaceError::Io {
                path: self.workspaces_dir.clone(),
                source,
            })?;

        let branch = self.free_branch(name).await?;
        let mut cmd = self.git();
        cmd.args(["worktree", "add", "-b", &branch])
            .arg(&path)
            .arg(&self.base_ref);
        let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree add").await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(branch, stderr = %stderr, "git worktree add failed");
            return Err(WorkspaceError::GitFailed {
                op: "worktree add".to_string(),
                detail: stderr.trim().to_string(),
            });
        }

        debug!(name, branch, path = %path.display(), "provisioned worktree");
        Ok(ProvisionedWorkspace { path, branch })
    }

    async fn teardown(
        &self,
        path: &Path,
        branch: &str,
        delete_branch: bool,
    ) -> Result<(), WorkspaceError> {
        if !path.exists() {
            // Already gone out of band; drop the stale worktree
            // registration so the path can be provisioned again and the
            // branch is no longer held checked-out.
            let mut prune = self.git();
            prune.args(["worktree", "prune"]);
            let _ = run_with_timeout(prune, GIT_TIMEOUT, "git worktree prune").await;
        } else {
            // No --force: a worktree holding uncommitted changes is refused
            // and handed back to the operator instead of discarded.
            let mut cmd = self.git();
            cmd.args(["worktree", "remove"]).arg(path);
            let output = run_with_timeout(cmd, GIT_TIMEOUT, "git worktree remove").await?;
            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                warn!(path = %path.display(), stderr = %stderr, "git worktree remove failed");
                // The branch still carries the stranded work; leave it.
                return Err(WorkspaceError::GitFailed {
                    op: "worktree remove".to_string(),
                    detail: stderr.trim().to_string(),
                });
            }
        }

        if delete_branch {
            let mut cmd = self.git();
            cmd.args(["branch", "-D", branch]);
            match run_with_timeout(cmd, GIT_TIMEOUT, "git branch -D").await {
                Ok(output) if output.status.success() => {
                    debug!(branch, "deleted session branch");
                }
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    warn!(branch, stderr = %stderr.trim(), "branch deletion failed");
                }
                Err(err) => {
                    warn!(branch, error = %err, "branch deletion failed");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
