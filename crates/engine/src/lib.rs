// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! winow-engine: session lifecycle orchestration
//!
//! Maps operator verbs onto the registry and the workspace/terminal
//! backends: reserve, provision, launch, commit on the way up; kill,
//! tear down, mark on the way down.

mod error;
mod orchestrator;

pub use error::OrchestratorError;
pub use orchestrator::{Orchestrator, SessionListing, StartSpec};
