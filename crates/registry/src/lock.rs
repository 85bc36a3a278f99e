// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory file locking for the registry store.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long to wait between acquisition attempts.
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// Default ceiling on lock acquisition. Holders only ever perform one
/// load-mutate-save round, so waiting longer means a wedged peer.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LockError {
    #[error("failed to open lock file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {waited_ms}ms waiting for registry lock {path}")]
    Timeout { path: PathBuf, waited_ms: u64 },
    #[error("failed to acquire registry lock {path}: {source}")]
    Acquire {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Exclusive lock over the registry store, released on drop.
///
/// Locks are per open file description, so concurrent invocations contend
/// correctly whether they are separate processes or threads.
pub struct StoreLock {
    file: File,
}

impl StoreLock {
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self, LockError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .map_err(|source| LockError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Self { file }),
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(LockError::Timeout {
                            path: path.to_path_buf(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }
                    std::thread::sleep(RETRY_INTERVAL);
                }
                Err(source) => {
                    return Err(LockError::Acquire {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
