// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow stop` - tear down a session's terminal, worktree, and branch

use anyhow::Result;
use clap::Args;

use crate::context::CommandContext;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct StopArgs {
    /// Session name or id prefix
    pub session: String,
}

pub async fn handle(args: StopArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let session = ctx.orchestrator.stop(&args.session).await?;

    match format {
        OutputFormat::Text => println!("stopped {}", session.name),
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "name": session.name,
                "id": session.id,
                "state": session.state,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
