// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the backends crate.

use std::time::Duration;

fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Pause between the agent invocation line and the prompt (default: 400ms).
pub fn boot_settle() -> Duration {
    parse_duration_ms("WINOW_BOOT_SETTLE_MS").unwrap_or(Duration::from_millis(400))
}
