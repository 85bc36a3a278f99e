// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! winow-core: Core library for the winow agent session manager

pub mod clock;
pub mod config;
pub mod id;
pub mod session;
pub mod slug;
pub mod time_fmt;

pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigError};
pub use id::{IdGen, UuidIdGen};
pub use session::{Session, SessionId, SessionState};
pub use slug::{derive_session_name, slugify};
pub use time_fmt::{format_elapsed, format_elapsed_ms};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-support"))]
pub use id::SequentialIdGen;
