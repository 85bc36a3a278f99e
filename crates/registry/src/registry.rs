// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locked registry API: reserve/commit/release plus lookups and state
//! transitions.
//!
//! Every method acquires the store lock, performs one load-mutate-save
//! round, and releases. Nothing is cached in memory between calls; each CLI
//! invocation sees whatever the last writer persisted.

use crate::lock::{StoreLock, DEFAULT_LOCK_TIMEOUT};
use crate::store::{ReservationRecord, Store};
use crate::{LockError, StoreError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use winow_core::{Session, SessionId, SessionState};

/// Reservations older than this belong to a crashed `start` (live starts
/// are bounded far below by the subprocess timeouts) and are reaped.
pub const RESERVATION_TTL_MS: u64 = 10 * 60 * 1000;

const STORE_FILE: &str = "sessions.json";
const LOCK_FILE: &str = "sessions.lock";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("session name '{name}' is already in use")]
    NameConflict { name: String },
    #[error("no session matches '{reference}'")]
    NotFound { reference: String },
    #[error("session reference '{reference}' is ambiguous")]
    Ambiguous { reference: String },
    #[error("reservation for '{name}' expired before commit")]
    ReservationExpired { name: String },
    #[error("illegal state transition for session {id}: {from} -> {to}")]
    InvalidTransition {
        id: SessionId,
        from: SessionState,
        to: SessionState,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A held name claim. Consumed by [`Registry::commit`] on success or
/// [`Registry::release`] on rollback; not cloneable, so a claim cannot be
/// settled twice.
#[derive(Debug)]
pub struct Reservation {
    id: SessionId,
    name: String,
}

impl Reservation {
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle to the persisted session registry under a state directory.
#[derive(Debug, Clone)]
pub struct Registry {
    store_path: PathBuf,
    lock_path: PathBuf,
    lock_timeout: Duration,
}

impl Registry {
    pub fn open(state_dir: &Path) -> Result<Self, RegistryError> {
        std::fs::create_dir_all(state_dir).map_err(StoreError::Io)?;
        Ok(Self {
            store_path: state_dir.join(STORE_FILE),
            lock_path: state_dir.join(LOCK_FILE),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        })
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Claim `name` for a new session.
    ///
    /// Fails with [`RegistryError::NameConflict`] when the name belongs to a
    /// live session or an unexpired reservation.
    pub fn reserve(
        &self,
        name: &str,
        id: SessionId,
        now_ms: u64,
    ) -> Result<Reservation, RegistryError> {
        self.with_store(|store| {
            reap(store, now_ms);
            if store.name_in_use(name) {
                return Err(RegistryError::NameConflict {
                    name: name.to_string(),
                });
            }
            Ok(insert_reservation(store, name, id, now_ms))
        })
    }

    /// Claim the first free `"{base}-{n}"` (n ≥ 2) name.
    ///
    /// Picking the suffix and inserting the claim happen under one lock
    /// round, so two concurrent disambiguations cannot collide.
    pub fn reserve_with_suffix(
        &self,
        base: &str,
        id: SessionId,
        now_ms: u64,
    ) -> Result<Reservation, RegistryError> {
        self.with_store(|store| {
            reap(store, now_ms);
            let mut n = 2u32;
            let name = loop {
                let candidate = format!("{base}-{n}");
                if !store.name_in_use(&candidate) {
                    break candidate;
                }
                n += 1;
            };
            Ok(insert_reservation(store, &name, id, now_ms))
        })
    }

    /// Replace the reservation with a committed session record.
    ///
    /// Fails with [`RegistryError::ReservationExpired`] when the claim is no
    /// longer ours (reaped after a crash-length delay, possibly reissued to
    /// another process).
    pub fn commit(&self, reservation: Reservation, session: Session) -> Result<(), RegistryError> {
        self.with_store(|store| {
            let still_ours = store
                .reservations
                .get(reservation.name())
                .is_some_and(|r| r.id == reservation.id);
            if !still_ours {
                return Err(RegistryError::ReservationExpired {
                    name: reservation.name.clone(),
                });
            }
            store.reservations.shift_remove(reservation.name());
            debug!(id = %session.id, name = %session.name, "committing session");
            store.sessions.insert(session.id.to_string(), session);
            Ok(())
        })
    }

    /// Drop the reservation during rollback. Never fails on a missing or
    /// reissued claim; rollback must not mask the error that caused it.
    pub fn release(&self, reservation: Reservation) -> Result<(), RegistryError> {
        self.with_store(|store| {
            let still_ours = store
                .reservations
                .get(reservation.name())
                .is_some_and(|r| r.id == reservation.id);
            if still_ours {
                store.reservations.shift_remove(reservation.name());
            }
            Ok(())
        })
    }

    /// Resolve a session by exact id, then exact name (live records
    /// preferred, then the most recent), then unique id prefix.
    pub fn get(&self, reference: &str) -> Result<Session, RegistryError> {
        self.read_store(|store| {
            if let Some(session) = store.sessions.get(reference) {
                return Ok(session.clone());
            }

            let mut live = None;
            let mut last = None;
            for session in store.sessions.values() {
                if session.name == reference {
                    last = Some(session);
                    if !session.state.is_terminal() {
                        live = Some(session);
                    }
                }
            }
            if let Some(session) = live.or(last) {
                return Ok(session.clone());
            }

            let mut matches = store
                .sessions
                .values()
                .filter(|s| s.id.as_str().starts_with(reference));
            match (matches.next(), matches.next()) {
                (Some(session), None) => Ok(session.clone()),
                (Some(_), Some(_)) => Err(RegistryError::Ambiguous {
                    reference: reference.to_string(),
                }),
                (None, _) => Err(RegistryError::NotFound {
                    reference: reference.to_string(),
                }),
            }
        })
    }

    /// All committed sessions in creation order. Reservations are invisible
    /// here; a session exists externally only once committed.
    pub fn list(&self) -> Result<Vec<Session>, RegistryError> {
        self.read_store(|store| Ok(store.sessions.values().cloned().collect()))
    }

    /// Transition a session's state, validating against the lifecycle
    /// machine. Marking the already-stored state is a no-op: reconciliation
    /// and an explicit `stop` may race to the same conclusion.
    pub fn mark_state(&self, id: &SessionId, state: SessionState) -> Result<(), RegistryError> {
        self.with_store(|store| {
            let session = store.sessions.get_mut(id.as_str()).ok_or_else(|| {
                RegistryError::NotFound {
                    reference: id.to_string(),
                }
            })?;
            if session.state == state {
                return Ok(());
            }
            if !session.state.can_transition_to(state) {
                return Err(RegistryError::InvalidTransition {
                    id: id.clone(),
                    from: session.state,
                    to: state,
                });
            }
            debug!(id = %id, from = %session.state, to = %state, "session state change");
            session.state = state;
            Ok(())
        })
    }

    /// Record send activity.
    pub fn touch(&self, id: &SessionId, now_ms: u64) -> Result<(), RegistryError> {
        self.with_store(|store| {
            let session = store.sessions.get_mut(id.as_str()).ok_or_else(|| {
                RegistryError::NotFound {
                    reference: id.to_string(),
                }
            })?;
            session.last_activity_at_ms = now_ms;
            Ok(())
        })
    }

    /// One locked load-mutate-save round. The store is only written back
    /// when the mutation succeeds.
    fn with_store<T>(
        &self,
        f: impl FnOnce(&mut Store) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let _lock = StoreLock::acquire(&self.lock_path, self.lock_timeout)?;
        let mut store = Store::load(&self.store_path)?;
        let out = f(&mut store)?;
        store.save(&self.store_path)?;
        Ok(out)
    }

    /// One locked read round; never writes.
    fn read_store<T>(
        &self,
        f: impl FnOnce(&Store) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let _lock = StoreLock::acquire(&self.lock_path, self.lock_timeout)?;
        let store = Store::load(&self.store_path)?;
        f(&store)
    }
}

fn reap(store: &mut Store, now_ms: u64) {
    let reaped = store.reap_expired_reservations(now_ms, RESERVATION_TTL_MS);
    if !reaped.is_empty() {
        debug!(names = ?reaped, "reaped stale reservations");
    }
}

fn insert_reservation(store: &mut Store, name: &str, id: SessionId, now_ms: u64) -> Reservation {
    store.reservations.insert(
        name.to_string(),
        ReservationRecord {
            id: id.clone(),
            name: name.to_string(),
            created_at_ms: now_ms,
        },
    );
    Reservation {
        id,
        name: name.to_string(),
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
