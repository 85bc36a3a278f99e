// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI verb implementations

pub mod attach;
pub mod peek;
pub mod ps;
pub mod send;
pub mod start;
pub mod stop;
