// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk registry document.
//!
//! A single versioned JSON file holding pending name reservations and
//! committed session records. Saves are atomic (temp file + rename) so a
//! crash mid-write never corrupts the store; loads of a corrupt or
//! foreign-version file fail loudly instead of silently dropping sessions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;
use winow_core::{Session, SessionId};

pub const STORE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt registry store {path}: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("registry store {path} has unsupported version {found} (expected {STORE_VERSION})")]
    UnsupportedVersion { path: PathBuf, found: u32 },
}

/// A persisted claim on a session name, serializing concurrent `start`
/// calls across processes. Carries its creation time so claims left by a
/// crashed process can be reaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub id: SessionId,
    pub name: String,
    pub created_at_ms: u64,
}

/// The registry document. Both maps preserve insertion order: sessions
/// iterate in creation order, which is the order `ps` lists them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub version: u32,
    /// Pending claims keyed by session name.
    #[serde(default)]
    pub reservations: IndexMap<String, ReservationRecord>,
    /// Committed sessions keyed by session id.
    #[serde(default)]
    pub sessions: IndexMap<String, Session>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            reservations: IndexMap::new(),
            sessions: IndexMap::new(),
        }
    }
}

impl Store {
    /// Load the store, treating a missing file as empty.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        let store: Store =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        if store.version != STORE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                path: path.to_path_buf(),
                found: store.version,
            });
        }
        Ok(store)
    }

    /// Save atomically: write to a temp file, sync, rename over the store.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("tmp");
        {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    /// Whether `name` is claimed by a live session or a pending reservation.
    pub fn name_in_use(&self, name: &str) -> bool {
        if self.reservations.contains_key(name) {
            return true;
        }
        self.sessions
            .values()
            .any(|s| s.name == name && !s.state.is_terminal())
    }

    /// Drop reservations older than `ttl_ms`, returning the reaped names.
    pub fn reap_expired_reservations(&mut self, now_ms: u64, ttl_ms: u64) -> Vec<String> {
        let expired: Vec<String> = self
            .reservations
            .values()
            .filter(|r| now_ms.saturating_sub(r.created_at_ms) > ttl_ms)
            .map(|r| r.name.clone())
            .collect();
        for name in &expired {
            self.reservations.shift_remove(name);
        }
        expired
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
