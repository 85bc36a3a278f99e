// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow attach` - foreground hand-off to a session's terminal
//!
//! The process blocks inside tmux until the operator detaches or the
//! session ends, then exits with tmux's own exit code. tmux prints its
//! own diagnostics, so a non-zero detach exits silently.

use anyhow::Result;
use clap::Args;

use crate::context::CommandContext;
use crate::exit_error::ExitError;

#[derive(Args, Debug)]
pub struct AttachArgs {
    /// Session name or id prefix
    pub session: String,
}

pub async fn handle(args: AttachArgs, ctx: &CommandContext) -> Result<()> {
    let session = ctx.orchestrator.attach_target(&args.session).await?;

    let code = ctx.terminal.attach(&session.terminal_id).await?;
    if code != 0 {
        return Err(ExitError::silent(code).into());
    }
    Ok(())
}
