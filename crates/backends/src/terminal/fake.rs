// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake terminal backend for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{TerminalBackend, TerminalError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCall {
    Create { name: String, cwd: PathBuf },
    SendText { id: String, text: String },
    SendEnter { id: String },
    IsAlive { id: String },
    ListSessions,
    Kill { id: String },
    Capture { id: String, lines: u32 },
}

/// Fake terminal session state
#[derive(Debug, Clone)]
pub struct FakeTerminalSession {
    pub name: String,
    pub cwd: PathBuf,
    pub alive: bool,
    pub output: String,
    pub typed: Vec<String>,
}

struct FakeTerminalState {
    sessions: HashMap<String, FakeTerminalSession>,
    calls: Vec<TerminalCall>,
    unreachable: bool,
    create_error: Option<String>,
    die_after_sends: HashMap<String, u32>,
}

/// In-memory terminal backend recording every call.
#[derive(Clone)]
pub struct FakeTerminalBackend {
    inner: Arc<Mutex<FakeTerminalState>>,
}

impl Default for FakeTerminalBackend {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeTerminalState {
                sessions: HashMap::new(),
                calls: Vec::new(),
                unreachable: false,
                create_error: None,
                die_after_sends: HashMap::new(),
            })),
        }
    }
}

impl FakeTerminalBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<TerminalCall> {
        self.inner.lock().calls.clone()
    }

    /// Get a session by id
    pub fn session(&self, id: &str) -> Option<FakeTerminalSession> {
        self.inner.lock().sessions.get(id).cloned()
    }

    /// Ids of live sessions, sorted for deterministic assertions
    pub fn live_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .inner
            .lock()
            .sessions
            .iter()
            .filter(|(_, s)| s.alive)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Simulate an out-of-band kill (operator ran kill-session directly)
    pub fn mark_dead(&self, id: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            session.alive = false;
        }
    }

    /// Set the pane output returned by capture
    pub fn set_output(&self, id: &str, output: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(id) {
            output.clone_into(&mut session.output);
        }
    }

    /// Make every subsequent call fail as unreachable
    pub fn set_unreachable(&self, unreachable: bool) {
        self.inner.lock().unreachable = unreachable;
    }

    /// Make the next create call fail
    pub fn fail_next_create(&self, message: &str) {
        self.inner.lock().create_error = Some(message.to_string());
    }

    /// Let the session survive exactly `sends` more keystroke deliveries,
    /// then die. Simulates a pane exiting mid-launch.
    pub fn kill_after_sends(&self, id: &str, sends: u32) {
        self.inner
            .lock()
            .die_after_sends
            .insert(id.to_string(), sends);
    }
}

impl FakeTerminalState {
    fn check_reachable(&self) -> Result<(), TerminalError> {
        if self.unreachable {
            Err(TerminalError::Unreachable(
                "simulated multiplexer outage".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn after_send(&mut self, id: &str) {
        let Some(count) = self.die_after_sends.get_mut(id) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.die_after_sends.remove(id);
            if let Some(session) = self.sessions.get_mut(id) {
                session.alive = false;
            }
        }
    }
}

#[async_trait]
impl TerminalBackend for FakeTerminalBackend {
    async fn create(&self, name: &str, cwd: &Path) -> Result<String, TerminalError> {
        let mut inner = self.inner.lock();

        inner.calls.push(TerminalCall::Create {
            name: name.to_string(),
            cwd: cwd.to_path_buf(),
        });

        inner.check_reachable()?;
        if let Some(message) = inner.create_error.take() {
            return Err(TerminalError::CreateFailed(message));
        }

        let id = format!("fake-{}", name);
        inner.sessions.insert(
            id.clone(),
            FakeTerminalSession {
                name: name.to_string(),
                cwd: cwd.to_path_buf(),
                alive: true,
                output: String::new(),
                typed: Vec::new(),
            },
        );

        Ok(id)
    }

    async fn send_text(&self, id: &str, text: &str) -> Result<(), TerminalError> {
        let mut inner = self.inner.lock();

        inner.calls.push(TerminalCall::SendText {
            id: id.to_string(),
            text: text.to_string(),
        });

        inner.check_reachable()?;
        let delivered = match inner.sessions.get_mut(id) {
            Some(session) if session.alive => {
                session.typed.push(text.to_string());
                true
            }
            _ => false,
        };
        if !delivered {
            return Err(TerminalError::NotFound(id.to_string()));
        }
        inner.after_send(id);
        Ok(())
    }

    async fn send_enter(&self, id: &str) -> Result<(), TerminalError> {
        let mut inner = self.inner.lock();

        inner
            .calls
            .push(TerminalCall::SendEnter { id: id.to_string() });

        inner.check_reachable()?;
        let alive = inner.sessions.get(id).is_some_and(|s| s.alive);
        if !alive {
            return Err(TerminalError::NotFound(id.to_string()));
        }
        inner.after_send(id);
        Ok(())
    }

    async fn is_alive(&self, id: &str) -> Result<bool, TerminalError> {
        let mut inner = self.inner.lock();

        inner
            .calls
            .push(TerminalCall::IsAlive { id: id.to_string() });

        inner.check_reachable()?;
        Ok(inner.sessions.get(id).map(|s| s.alive).unwrap_or(false))
    }

    async fn list_sessions(&self) -> Result<Vec<String>, TerminalError> {
        let mut inner = self.inner.lock();

        inner.calls.push(TerminalCall::ListSessions);

        inner.check_reachable()?;
        let mut ids: Vec<String> = inner
            .sessions
            .iter()
            .filter(|(_, s)| s.alive)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn kill(&self, id: &str) -> Result<(), TerminalError> {
        let mut inner = self.inner.lock();

        inner.calls.push(TerminalCall::Kill { id: id.to_string() });

        inner.check_reachable()?;
        if let Some(session) = inner.sessions.get_mut(id) {
            session.alive = false;
        }
        Ok(())
    }

    async fn capture(&self, id: &str, lines: u32) -> Result<String, TerminalError> {
        let mut inner = self.inner.lock();

        inner.calls.push(TerminalCall::Capture {
            id: id.to_string(),
            lines,
        });

        inner.check_reachable()?;
        match inner.sessions.get(id) {
            Some(session) if session.alive => {
                let all: Vec<&str> = session.output.lines().collect();
                let start = all.len().saturating_sub(lines as usize);
                Ok(all[start..].join("\n"))
            }
            _ => Err(TerminalError::NotFound(id.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
