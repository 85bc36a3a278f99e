// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! winow - launch and manage coding-agent sessions

mod color;
mod commands;
mod context;
mod env;
mod exit_error;
mod output;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;

use crate::context::CommandContext;

#[derive(Parser, Debug)]
#[command(
    name = "winow",
    version,
    about = "winow - agent sessions in isolated worktrees",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(
        short = 'o',
        long = "output",
        value_enum,
        default_value_t,
        global = true
    )]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start an agent session in a fresh worktree
    Start(commands::start::StartArgs),
    /// List sessions
    Ps,
    /// Send a message to a running session
    Send(commands::send::SendArgs),
    /// Show the tail of a session's terminal
    Peek(commands::peek::PeekArgs),
    /// Attach to a session's terminal (detach with the tmux prefix)
    Attach(commands::attach::AttachArgs),
    /// Stop a session and remove its worktree
    Stop(commands::stop::StopArgs),
}

#[tokio::main]
async fn main() {
    setup_logging();
    if let Err(e) = run().await {
        let code = e
            .downcast_ref::<exit_error::ExitError>()
            .map_or(1, |c| c.code);
        let msg = format_error(&e);
        if !msg.is_empty() {
            eprintln!("Error: {}", msg);
        }
        std::process::exit(code);
    }
}

/// Tracing to stderr, silent unless `WINOW_LOG` sets a filter.
fn setup_logging() {
    let Some(filter) = env::log_filter() else {
        return;
    };
    use tracing_subscriber::{fmt, EnvFilter};
    let _ = fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Format an anyhow error, deduplicating the chain.
///
/// If the top-level Display already contains the source error text, we skip
/// the "Caused by" chain to avoid noisy duplicate output (common when
/// thiserror variants use `#[error("... {0}")]` with `#[from]`).
/// Otherwise we render the full chain so context isn't lost.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();

    let chain_redundant = err
        .chain()
        .skip(1)
        .all(|cause| top.contains(&cause.to_string()));

    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let format = cli.output;

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            // No subcommand - print help and exit 0
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Start(args) => {
            let ctx = CommandContext::for_workspace_verb().await?;
            commands::start::handle(args, &ctx, format).await?
        }
        Commands::Ps => {
            let ctx = CommandContext::for_terminal_verb().await?;
            commands::ps::handle(&ctx, format).await?
        }
        Commands::Send(args) => {
            let ctx = CommandContext::for_terminal_verb().await?;
            commands::send::handle(args, &ctx, format).await?
        }
        Commands::Peek(args) => {
            let ctx = CommandContext::for_terminal_verb().await?;
            commands::peek::handle(args, &ctx, format).await?
        }
        Commands::Attach(args) => {
            let ctx = CommandContext::for_terminal_verb().await?;
            commands::attach::handle(args, &ctx).await?
        }
        Commands::Stop(args) => {
            let ctx = CommandContext::for_workspace_verb().await?;
            commands::stop::handle(args, &ctx, format).await?
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod main_tests;
