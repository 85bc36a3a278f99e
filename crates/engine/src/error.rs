// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operator-facing error taxonomy for session orchestration

use std::path::PathBuf;
use thiserror::Error;
use winow_backends::WorkspaceError;
use winow_core::SessionState;
use winow_registry::RegistryError;

/// Errors surfaced by [`crate::Orchestrator`] operations.
///
/// Every variant names the offending session or resource; the CLI prints
/// these verbatim.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("session name '{name}' is already taken")]
    NameConflict { name: String },
    #[error("workspace path {} already exists; remove it before reusing the name", .path.display())]
    WorkspaceConflict { path: PathBuf },
    #[error("agent launch failed for session '{name}': {reason}")]
    AgentLaunchFailed { name: String, reason: String },
    #[error("no session matches '{reference}'")]
    SessionNotFound { reference: String },
    #[error("session reference '{reference}' is ambiguous")]
    AmbiguousReference { reference: String },
    #[error("session '{name}' is not running (state: {state})")]
    SessionNotRunning { name: String, state: SessionState },
    #[error("stop left resources behind for session '{name}': {}", remains.join(", "))]
    TeardownPartialFailure { name: String, remains: Vec<String> },
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("could not derive a usable session name from '{input}'")]
    InvalidName { input: String },
    #[error("workspace provisioning failed: {0}")]
    Provision(#[source] WorkspaceError),
    #[error(transparent)]
    Registry(RegistryError),
}
