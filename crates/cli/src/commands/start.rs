// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow start` - launch an agent session in a fresh workspace

use anyhow::{bail, Result};
use clap::Args;
use winow_core::Config;
use winow_engine::StartSpec;

use crate::context::CommandContext;
use crate::output::OutputFormat;

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Session name (derived from the prompt when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// Agent kind; with a single argument this is the prompt and the
    /// configured default agent is used
    #[arg(value_name = "AGENT")]
    pub agent: String,

    /// Task prompt typed into the agent once it is up
    #[arg(value_name = "PROMPT")]
    pub prompt: Option<String>,
}

/// A fully resolved launch request: which agent, how to invoke it, and what
/// to ask it.
#[derive(Debug)]
struct Invocation {
    agent: String,
    command: String,
    prompt: String,
}

pub async fn handle(args: StartArgs, ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let invocation = resolve_invocation(&ctx.config, args.agent, args.prompt)?;

    let session = ctx
        .orchestrator
        .start(StartSpec {
            agent: invocation.agent,
            command: invocation.command,
            prompt: invocation.prompt,
            name: args.name,
        })
        .await?;

    match format {
        OutputFormat::Text => println!("{}", session.name),
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "name": session.name,
                "id": session.id,
                "agent": session.agent,
                "workspace": session.workspace_path,
                "branch": session.branch,
                "terminal": session.terminal_id,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
    }
    Ok(())
}

/// With both positionals, the first is the agent kind; with one, it is the
/// prompt and the configured default agent is used. An agent kind with
/// neither a built-in nor a configured command is rejected here, before
/// anything is provisioned.
fn resolve_invocation(config: &Config, first: String, second: Option<String>) -> Result<Invocation> {
    let (agent, prompt) = match second {
        Some(prompt) => (first, prompt),
        None => (config.default_agent().to_string(), first),
    };
    let Some(command) = config.agent_command(&agent) else {
        bail!(
            "unknown agent '{}' (known agents: {})",
            agent,
            config.known_agents().join(", ")
        );
    };
    Ok(Invocation {
        agent,
        command,
        prompt,
    })
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
