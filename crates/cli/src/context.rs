// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires the verbs to production backends.
//!
//! Every invocation builds a fresh context: probe the binaries the verb
//! needs, open the registry, load configuration, assemble the orchestrator.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use winow_backends::{GitBackend, TmuxBackend};
use winow_core::config::find_repo_root;
use winow_core::{Config, SystemClock, UuidIdGen};
use winow_engine::Orchestrator;
use winow_registry::Registry;

use crate::env;

pub struct CommandContext {
    pub orchestrator: Orchestrator<GitBackend, TmuxBackend, SystemClock, UuidIdGen>,
    pub terminal: TmuxBackend,
    pub config: Config,
}

impl CommandContext {
    /// Context for verbs that provision or tear down worktrees (`start`,
    /// `stop`). Needs git and tmux, and must run inside the repository the
    /// session belongs to.
    pub async fn for_workspace_verb() -> Result<Self> {
        GitBackend::probe()
            .await
            .context("git is required but not usable")?;
        let cwd = invoke_dir()?;
        let repo_root = GitBackend::discover_repo_root(&cwd)
            .await
            .context("start and stop must run inside a git repository")?;
        Self::build(repo_root).await
    }

    /// Context for verbs that only talk to the terminal backend (`ps`,
    /// `send`, `peek`, `attach`). Works from any directory; the workspace
    /// backend is wired but never invoked.
    pub async fn for_terminal_verb() -> Result<Self> {
        Self::build(invoke_dir()?).await
    }

    async fn build(repo_root: PathBuf) -> Result<Self> {
        let terminal = TmuxBackend::new();
        terminal
            .probe()
            .await
            .context("tmux is required but not usable")?;

        let state_dir = env::state_dir()?;
        let registry = Registry::open(&state_dir)
            .with_context(|| format!("could not open state directory {}", state_dir.display()))?;

        let config = load_config()?;
        let workspace = GitBackend::new(
            repo_root,
            state_dir.join("workspaces"),
            config.base_ref(),
        );
        let orchestrator = Orchestrator::new(
            registry,
            workspace,
            terminal.clone(),
            SystemClock,
            UuidIdGen,
        );
        Ok(Self {
            orchestrator,
            terminal,
            config,
        })
    }
}

/// User config overlaid with the project's `.winow.toml`, found by walking
/// up from the invocation directory to the first `.git`.
fn load_config() -> Result<Config> {
    let user = env::user_config_path();
    let project = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_repo_root(&cwd))
        .map(|root| root.join(".winow.toml"));
    Config::load(user.as_deref(), project.as_deref()).context("could not load configuration")
}

fn invoke_dir() -> Result<PathBuf> {
    std::env::current_dir().context("could not determine current directory")
}
