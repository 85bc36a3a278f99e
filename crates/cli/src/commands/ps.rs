// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `winow ps` - list sessions reconciled against live terminal state

use std::io::Write;

use anyhow::Result;
use serde::Serialize;
use winow_core::{format_elapsed_ms, Clock, Session, SystemClock};
use winow_engine::SessionListing;

use crate::context::CommandContext;
use crate::output::OutputFormat;
use crate::table::{Column, Table};

pub async fn handle(ctx: &CommandContext, format: OutputFormat) -> Result<()> {
    let listings = ctx.orchestrator.list_sessions().await?;

    match format {
        OutputFormat::Text => {
            if listings.is_empty() {
                println!("No sessions");
            } else {
                let now_ms = SystemClock.epoch_ms();
                format_sessions(&mut std::io::stdout(), &listings, now_ms);
            }
        }
        OutputFormat::Json => {
            let rows: Vec<PsRow> = listings.iter().map(PsRow::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }
    Ok(())
}

/// The stored record plus whether the state could be verified this
/// invocation.
#[derive(Serialize)]
struct PsRow<'a> {
    #[serde(flatten)]
    session: &'a Session,
    state_known: bool,
}

impl<'a> From<&'a SessionListing> for PsRow<'a> {
    fn from(listing: &'a SessionListing) -> Self {
        Self {
            session: &listing.session,
            state_known: listing.state_known,
        }
    }
}

fn format_sessions(w: &mut impl Write, listings: &[SessionListing], now_ms: u64) {
    let mut table = Table::new(vec![
        Column::left("NAME"),
        Column::status("STATE"),
        Column::right("AGE"),
        Column::muted("WORKSPACE").with_max(60),
    ]);

    for listing in listings {
        let state = if listing.state_known {
            listing.session.state.to_string()
        } else {
            "unknown".to_string()
        };
        table.row(vec![
            listing.session.name.clone(),
            state,
            format_elapsed_ms(listing.session.activity_age_ms(now_ms)),
            listing.session.workspace_path.display().to_string(),
        ]);
    }

    table.render(w);
}

#[cfg(test)]
#[path = "ps_tests.rs"]
mod tests;
