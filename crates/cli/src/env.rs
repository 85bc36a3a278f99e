// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI crate.

use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Resolve state directory: WINOW_STATE_DIR > XDG_STATE_HOME/winow >
/// ~/.local/state/winow
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WINOW_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("winow"));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("could not determine home directory"))?;
    Ok(home.join(".local/state/winow"))
}

/// User config file: ~/.config/winow/config.toml
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("winow/config.toml"))
}

// --- Color ---

pub fn no_color() -> bool {
    std::env::var("NO_COLOR").is_ok_and(|v| v == "1")
}

pub fn force_color() -> bool {
    std::env::var("COLOR").is_ok_and(|v| v == "1")
}

// --- Logging ---

/// Filter string for the tracing subscriber; logging is silent when unset.
pub fn log_filter() -> Option<String> {
    std::env::var("WINOW_LOG").ok().filter(|s| !s.is_empty())
}
