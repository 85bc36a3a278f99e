// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! winow-registry: persisted session registry
//!
//! The registry is the single source of truth for sessions, shared by every
//! CLI invocation as a JSON document on disk. All access goes through an
//! exclusive advisory file lock held for one load-mutate-save round at a
//! time; the reservation protocol built on top of it serializes concurrent
//! `start` calls per name.

mod lock;
mod registry;
mod store;

pub use lock::{LockError, StoreLock, DEFAULT_LOCK_TIMEOUT};
pub use registry::{Registry, RegistryError, Reservation, RESERVATION_TTL_MS};
pub use store::{ReservationRecord, Store, StoreError, STORE_VERSION};
