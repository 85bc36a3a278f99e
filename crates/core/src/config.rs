// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loading and merging.
//!
//! Two optional TOML files feed one [`Config`]: the user file at
//! `~/.config/winow/config.toml` and the project file `.winow.toml` at the
//! repository root. Project values override user values; agent tables merge
//! per kind. Missing files are simply empty configs.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Agent used when `start` is given only a prompt.
pub const DEFAULT_AGENT: &str = "opencode";

/// Agent kinds usable without any configuration; their invocation line is
/// the kind itself.
pub const BUILTIN_AGENTS: &[&str] = &["claude", "codex", "opencode"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub defaults: Defaults,
    pub agents: BTreeMap<String, AgentConfig>,
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Invocation line typed into the pane at launch.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Base ref for new session branches. Defaults to `HEAD`.
    pub base_ref: Option<String>,
}

impl Config {
    /// Load and merge the user and project config files. Either path may be
    /// absent on disk or `None`.
    pub fn load(user_path: Option<&Path>, project_path: Option<&Path>) -> Result<Self, ConfigError> {
        let user = Self::load_file(user_path)?;
        let project = Self::load_file(project_path)?;
        Ok(user.merged_with(project))
    }

    fn load_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overlay `over` onto `self`: scalar fields replace, agent tables merge
    /// per kind.
    pub fn merged_with(mut self, over: Config) -> Config {
        if over.defaults.agent.is_some() {
            self.defaults.agent = over.defaults.agent;
        }
        for (kind, agent) in over.agents {
            match self.agents.get_mut(&kind) {
                Some(existing) => {
                    if agent.command.is_some() {
                        existing.command = agent.command;
                    }
                }
                None => {
                    self.agents.insert(kind, agent);
                }
            }
        }
        if over.workspace.base_ref.is_some() {
            self.workspace.base_ref = over.workspace.base_ref;
        }
        self
    }

    pub fn default_agent(&self) -> &str {
        self.defaults.agent.as_deref().unwrap_or(DEFAULT_AGENT)
    }

    /// Invocation line for an agent kind: configured command first, then the
    /// kind itself for configured-without-command and built-in kinds.
    pub fn agent_command(&self, kind: &str) -> Option<String> {
        if let Some(agent) = self.agents.get(kind) {
            return Some(agent.command.clone().unwrap_or_else(|| kind.to_string()));
        }
        if BUILTIN_AGENTS.contains(&kind) {
            return Some(kind.to_string());
        }
        None
    }

    /// Built-in plus configured agent kinds, sorted, for error messages.
    pub fn known_agents(&self) -> Vec<String> {
        let mut kinds: Vec<String> = BUILTIN_AGENTS.iter().map(|s| s.to_string()).collect();
        for kind in self.agents.keys() {
            if !kinds.iter().any(|k| k == kind) {
                kinds.push(kind.clone());
            }
        }
        kinds.sort();
        kinds
    }

    pub fn base_ref(&self) -> &str {
        self.workspace.base_ref.as_deref().unwrap_or("HEAD")
    }
}

/// Walk up from `start` to the first directory containing `.git`.
///
/// `.git` may be a directory (normal checkout) or a file (worktree).
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
