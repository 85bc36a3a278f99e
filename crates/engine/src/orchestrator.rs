// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session lifecycle orchestration.
//!
//! One [`Orchestrator`] call maps one operator verb onto the registry and
//! the workspace/terminal backends. Nothing survives in memory between
//! calls; the registry's persisted store carries all shared state, so
//! concurrent invocations coordinate only through it.

use crate::error::OrchestratorError;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use winow_backends::{
    launch_agent, LaunchTiming, ProvisionedWorkspace, TerminalBackend, TerminalError,
    WorkspaceBackend, WorkspaceError,
};
use winow_core::slug::MAX_NAME_LEN;
use winow_core::{derive_session_name, slugify, Clock, IdGen, Session, SessionId, SessionState};
use winow_registry::{Registry, RegistryError, Reservation};

/// Everything `start` needs, resolved by the caller: the agent kind, its
/// invocation line, and the task prompt.
#[derive(Debug, Clone)]
pub struct StartSpec {
    pub agent: String,
    pub command: String,
    pub prompt: String,
    /// Explicit session name; derived from the prompt when absent.
    pub name: Option<String>,
}

/// One listing row: the stored record plus whether its state could be
/// verified against the terminal backend.
#[derive(Debug, Clone)]
pub struct SessionListing {
    pub session: Session,
    /// False when the terminal backend could not answer; the stored state
    /// may be stale and displays as unknown.
    pub state_known: bool,
}

/// Coordinates the registry and the backends into the session lifecycle.
pub struct Orchestrator<W, T, C, I> {
    registry: Registry,
    workspace: W,
    terminal: T,
    clock: C,
    id_gen: I,
    timing: LaunchTiming,
}

impl<W, T, C, I> Orchestrator<W, T, C, I>
where
    W: WorkspaceBackend,
    T: TerminalBackend,
    C: Clock,
    I: IdGen,
{
    pub fn new(registry: Registry, workspace: W, terminal: T, clock: C, id_gen: I) -> Self {
        Self {
            registry,
            workspace,
            terminal,
            clock,
            id_gen,
            timing: LaunchTiming::default(),
        }
    }

    /// Override the pacing between launch keystrokes.
    pub fn with_timing(mut self, timing: LaunchTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Reserve a name, provision a workspace, create a terminal session,
    /// type the agent into it, and commit the record as `Running`.
    ///
    /// Any step failure tears down whatever was built and releases the
    /// name; a session either reaches `Running` whole or leaves nothing
    /// behind.
    pub async fn start(&self, spec: StartSpec) -> Result<Session, OrchestratorError> {
        let base = match spec.name.as_deref() {
            Some(explicit) => {
                let slug = slugify(explicit, MAX_NAME_LEN);
                if slug.is_empty() {
                    return Err(OrchestratorError::InvalidName {
                        input: explicit.to_string(),
                    });
                }
                slug
            }
            None => derive_session_name(&spec.prompt, &spec.agent),
        };

        let id = SessionId::new(self.id_gen.next());
        let now = self.clock.epoch_ms();
        let reservation = match self.registry.reserve(&base, id.clone(), now) {
            Ok(reservation) => reservation,
            Err(RegistryError::NameConflict { .. }) => {
                // One retry with a numeric suffix, picked under the same
                // lock that claims it.
                self.registry
                    .reserve_with_suffix(&base, id.clone(), now)
                    .map_err(registry_err)?
            }
            Err(err) => return Err(registry_err(err)),
        };
        let name = reservation.name().to_string();
        debug!(name, agent = %spec.agent, "reserved session name");

        let workspace = match self.workspace.provision(&name).await {
            Ok(workspace) => workspace,
            Err(err) => {
                self.release_quietly(reservation);
                return Err(provision_err(err));
            }
        };

        let terminal_id = match self.terminal.create(&name, &workspace.path).await {
            Ok(terminal_id) => terminal_id,
            Err(err) => {
                let mapped = match err {
                    TerminalError::Unreachable(msg) => OrchestratorError::BackendUnavailable(msg),
                    other => OrchestratorError::AgentLaunchFailed {
                        name: name.clone(),
                        reason: other.to_string(),
                    },
                };
                self.rollback_start(reservation, &spec, &workspace, None)
                    .await;
                return Err(mapped);
            }
        };

        if let Err(err) = launch_agent(
            &self.terminal,
            &terminal_id,
            &spec.command,
            &spec.prompt,
            self.timing,
        )
        .await
        {
            let mapped = match err.terminal() {
                TerminalError::Unreachable(_) => {
                    OrchestratorError::BackendUnavailable(err.to_string())
                }
                _ => OrchestratorError::AgentLaunchFailed {
                    name: name.clone(),
                    reason: err.to_string(),
                },
            };
            self.rollback_start(reservation, &spec, &workspace, Some(&terminal_id))
                .await;
            return Err(mapped);
        }

        let now = self.clock.epoch_ms();
        let session = Session {
            id,
            name: name.clone(),
            agent: spec.agent,
            command: spec.command,
            prompt: spec.prompt,
            workspace_path: workspace.path.clone(),
            branch: workspace.branch.clone(),
            terminal_id: terminal_id.clone(),
            state: SessionState::Running,
            created_at_ms: now,
            last_activity_at_ms: now,
        };
        if let Err(err) = self.registry.commit(reservation, session.clone()) {
            // No record may keep resources alive invisibly; without a
            // committed record the launch is undone, agent included.
            warn!(name, error = %err, "commit failed after launch; tearing down");
            if let Err(kill_err) = self.terminal.kill(&terminal_id).await {
                warn!(terminal_id, error = %kill_err, "rollback: terminal kill failed");
            }
            if let Err(ws_err) = self
                .workspace
                .teardown(&workspace.path, &workspace.branch, true)
                .await
            {
                warn!(path = %workspace.path.display(), error = %ws_err, "rollback: workspace teardown failed");
            }
            return Err(registry_err(err));
        }

        info!(
            name,
            id = %session.id,
            workspace = %session.workspace_path.display(),
            "session running"
        );
        Ok(session)
    }

    /// Kill the terminal session, tear down the workspace, and mark the
    /// record `Stopped`.
    ///
    /// A session found in `Stopping` is a crashed prior stop and is
    /// resumed. Partial teardown marks the record `Failed` and reports
    /// what survived.
    pub async fn stop(&self, reference: &str) -> Result<Session, OrchestratorError> {
        let mut session = self.registry.get(reference).map_err(registry_err)?;
        if !matches!(
            session.state,
            SessionState::Running | SessionState::Stopping
        ) {
            return Err(OrchestratorError::SessionNotRunning {
                name: session.name,
                state: session.state,
            });
        }
        info!(name = %session.name, "stopping session");
        self.registry
            .mark_state(&session.id, SessionState::Stopping)
            .map_err(registry_err)?;

        // An unanswered kill leaves the record in Stopping; a later stop
        // resumes from here.
        if let Err(err) = self.terminal.kill(&session.terminal_id).await {
            return Err(OrchestratorError::BackendUnavailable(err.to_string()));
        }

        let delete_branch = self.branch_unshared(&session)?;
        match self
            .workspace
            .teardown(&session.workspace_path, &session.branch, delete_branch)
            .await
        {
            Ok(()) => {}
            Err(WorkspaceError::Unreachable(msg)) => {
                return Err(OrchestratorError::BackendUnavailable(msg));
            }
            Err(err) => {
                warn!(name = %session.name, error = %err, "workspace teardown failed");
                if let Err(mark_err) = self.registry.mark_state(&session.id, SessionState::Failed)
                {
                    warn!(id = %session.id, error = %mark_err, "could not mark session failed");
                }
                return Err(OrchestratorError::TeardownPartialFailure {
                    name: session.name,
                    remains: vec![format!("workspace {}", session.workspace_path.display())],
                });
            }
        }

        self.registry
            .mark_state(&session.id, SessionState::Stopped)
            .map_err(registry_err)?;
        info!(name = %session.name, "session stopped");
        session.state = SessionState::Stopped;
        Ok(session)
    }

    /// Type a message plus Enter into a running session's pane and record
    /// the activity.
    pub async fn send(&self, reference: &str, text: &str) -> Result<Session, OrchestratorError> {
        let mut session = self.require_running(reference).await?;
        if let Err(err) = self.terminal.send_text(&session.terminal_id, text).await {
            return Err(self.delivery_failure(&session, err));
        }
        if let Err(err) = self.terminal.send_enter(&session.terminal_id).await {
            return Err(self.delivery_failure(&session, err));
        }
        let now = self.clock.epoch_ms();
        self.registry.touch(&session.id, now).map_err(registry_err)?;
        session.last_activity_at_ms = now;
        debug!(name = %session.name, bytes = text.len(), "delivered message");
        Ok(session)
    }

    /// Capture the tail of a running session's pane. Returns the resolved
    /// session alongside the captured output.
    pub async fn peek(
        &self,
        reference: &str,
        lines: u32,
    ) -> Result<(Session, String), OrchestratorError> {
        let session = self.require_running(reference).await?;
        match self.terminal.capture(&session.terminal_id, lines).await {
            Ok(output) => Ok((session, output)),
            Err(err) => Err(self.delivery_failure(&session, err)),
        }
    }

    /// Resolve a running session for a foreground attach. The blocking
    /// hand-off itself lives in the command layer.
    pub async fn attach_target(&self, reference: &str) -> Result<Session, OrchestratorError> {
        self.require_running(reference).await
    }

    /// All sessions in creation order, reconciled against the terminal
    /// backend.
    ///
    /// A non-terminal record whose terminal session is definitively gone
    /// is marked `Stopped` here, so an out-of-band kill shows up on the
    /// very next listing. An unreachable backend degrades the affected
    /// rows to unknown instead of failing the listing.
    pub async fn list_sessions(&self) -> Result<Vec<SessionListing>, OrchestratorError> {
        let sessions = self.registry.list().map_err(registry_err)?;

        let live: HashSet<String> = match self.terminal.list_sessions().await {
            Ok(ids) => ids.into_iter().collect(),
            Err(err) => {
                warn!(error = %err, "terminal backend unreachable; listing degraded");
                return Ok(sessions
                    .into_iter()
                    .map(|session| {
                        let state_known = session.state.is_terminal();
                        SessionListing {
                            session,
                            state_known,
                        }
                    })
                    .collect());
            }
        };

        let mut listings = Vec::with_capacity(sessions.len());
        for mut session in sessions {
            if !session.state.is_terminal() && !live.contains(&session.terminal_id) {
                match self.registry.mark_state(&session.id, SessionState::Stopped) {
                    Ok(()) => session.state = SessionState::Stopped,
                    Err(err) => {
                        warn!(id = %session.id, error = %err, "could not reconcile vanished session");
                    }
                }
            }
            listings.push(SessionListing {
                session,
                state_known: true,
            });
        }
        Ok(listings)
    }

    /// Look up a session and verify it is both recorded `Running` and
    /// actually alive in the terminal backend.
    async fn require_running(&self, reference: &str) -> Result<Session, OrchestratorError> {
        let session = self.registry.get(reference).map_err(registry_err)?;
        if session.state != SessionState::Running {
            return Err(OrchestratorError::SessionNotRunning {
                name: session.name,
                state: session.state,
            });
        }
        let alive = self
            .terminal
            .is_alive(&session.terminal_id)
            .await
            .map_err(|err| OrchestratorError::BackendUnavailable(err.to_string()))?;
        if !alive {
            return Err(self.observed_gone(&session));
        }
        Ok(session)
    }

    /// Undo a partially built start. When cleanup itself fails the
    /// leftovers are committed as a `Failed` record so they stay visible.
    async fn rollback_start(
        &self,
        reservation: Reservation,
        spec: &StartSpec,
        workspace: &ProvisionedWorkspace,
        terminal_id: Option<&str>,
    ) {
        let mut clean = true;

        if let Some(terminal_id) = terminal_id {
            if let Err(err) = self.terminal.kill(terminal_id).await {
                warn!(terminal_id, error = %err, "rollback: terminal kill failed");
                clean = false;
            }
        }

        // The branch was cut by this very start; nothing else can
        // reference it yet.
        if let Err(err) = self
            .workspace
            .teardown(&workspace.path, &workspace.branch, true)
            .await
        {
            warn!(path = %workspace.path.display(), error = %err, "rollback: workspace teardown failed");
            clean = false;
        }

        if clean {
            self.release_quietly(reservation);
            return;
        }

        let now = self.clock.epoch_ms();
        let session = Session {
            id: reservation.id().clone(),
            name: reservation.name().to_string(),
            agent: spec.agent.clone(),
            command: spec.command.clone(),
            prompt: spec.prompt.clone(),
            workspace_path: workspace.path.clone(),
            branch: workspace.branch.clone(),
            terminal_id: terminal_id.unwrap_or_default().to_string(),
            state: SessionState::Failed,
            created_at_ms: now,
            last_activity_at_ms: now,
        };
        if let Err(err) = self.registry.commit(reservation, session) {
            warn!(error = %err, "rollback: could not record leftover resources");
        }
    }

    fn release_quietly(&self, reservation: Reservation) {
        if let Err(err) = self.registry.release(reservation) {
            warn!(error = %err, "failed to release reservation");
        }
    }

    /// The terminal session is definitively gone; fold that into the
    /// record before reporting.
    fn observed_gone(&self, session: &Session) -> OrchestratorError {
        if let Err(err) = self.registry.mark_state(&session.id, SessionState::Stopped) {
            warn!(id = %session.id, error = %err, "could not reconcile vanished session");
        }
        OrchestratorError::SessionNotRunning {
            name: session.name.clone(),
            state: SessionState::Stopped,
        }
    }

    fn delivery_failure(&self, session: &Session, err: TerminalError) -> OrchestratorError {
        match err {
            TerminalError::NotFound(_) => self.observed_gone(session),
            other => OrchestratorError::BackendUnavailable(other.to_string()),
        }
    }

    /// Whether this session is the only live referent of its branch.
    fn branch_unshared(&self, session: &Session) -> Result<bool, OrchestratorError> {
        let sessions = self.registry.list().map_err(registry_err)?;
        Ok(sessions.iter().all(|other| {
            other.id == session.id || other.state.is_terminal() || other.branch != session.branch
        }))
    }
}

fn registry_err(err: RegistryError) -> OrchestratorError {
    match err {
        RegistryError::NameConflict { name } => OrchestratorError::NameConflict { name },
        RegistryError::NotFound { reference } => OrchestratorError::SessionNotFound { reference },
        RegistryError::Ambiguous { reference } => OrchestratorError::AmbiguousReference { reference },
        other => OrchestratorError::Registry(other),
    }
}

fn provision_err(err: WorkspaceError) -> OrchestratorError {
    match err {
        WorkspaceError::PathExists(path) => OrchestratorError::WorkspaceConflict { path },
        WorkspaceError::Unreachable(msg) => OrchestratorError::BackendUnavailable(msg),
        other => OrchestratorError::Provision(other),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
