// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow send` - deliver a message to a running session's terminal

use anyhow::Result;
use clap::Args;

use crate::context::CommandContext;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Session name or id prefix
    pub session: String,

    /// Message typed into the session followed by Enter
    pub message: String,
}

pub async fn handle(args: SendArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let session = ctx.orchestrator.send(&args.session, &args.message).await?;

    match format {
        OutputFormat::Text => println!("sent to {}", session.name),
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "name": session.name,
                "id": session.id,
                "last_activity_at_ms": session.last_activity_at_ms,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
