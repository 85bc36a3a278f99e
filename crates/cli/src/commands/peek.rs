// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow peek` - show the tail of a session's terminal output

use anyhow::Result;
use clap::Args;

use crate::context::CommandContext;
use crate::output::{print_peek_frame, OutputFormat};

#[derive(Args, Debug)]
pub struct PeekArgs {
    /// Session name or id prefix
    pub session: String,

    /// Number of trailing pane lines to show
    #[arg(long, default_value_t = 40)]
    pub lines: u32,
}

pub async fn handle(args: PeekArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let (session, output) = ctx.orchestrator.peek(&args.session, args.lines).await?;

    match format {
        OutputFormat::Text => print_peek_frame(&session.name, &output),
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "name": session.name,
                "output": output,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}
