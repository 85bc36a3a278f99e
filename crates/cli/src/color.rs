// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::IsTerminal;

pub mod codes {
    /// Section headers and table headers: pastel cyan / steel blue
    pub const HEADER: u8 = 74;
    /// Commands and literals: light grey
    pub const LITERAL: u8 = 250;
    /// Descriptions and placeholders: medium grey
    pub const CONTEXT: u8 = 245;
    /// Muted / secondary text: darker grey
    pub const MUTED: u8 = 240;

    /// Pre-formatted ANSI escape sequences for use in tests
    #[cfg(test)]
    pub const HEADER_START: &str = "\x1b[38;5;74m";
    #[cfg(test)]
    pub const MUTED_START: &str = "\x1b[38;5;240m";
    #[cfg(test)]
    pub const RESET: &str = "\x1b[0m";
}

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

const RESET: &str = "\x1b[0m";

/// Clap help styling matching the CLI's own palette.
pub fn styles() -> clap::builder::styling::Styles {
    use clap::builder::styling::{Ansi256Color, Style, Styles};

    if !should_colorize() {
        return Styles::plain();
    }
    let header = Style::new().fg_color(Some(Ansi256Color(codes::HEADER).into()));
    let literal = Style::new().fg_color(Some(Ansi256Color(codes::LITERAL).into()));
    let placeholder = Style::new().fg_color(Some(Ansi256Color(codes::CONTEXT).into()));
    Styles::styled()
        .header(header)
        .usage(header)
        .literal(literal)
        .placeholder(placeholder)
}

/// Format text with the header color (steel blue).
pub fn header(text: &str) -> String {
    if should_colorize() {
        apply_header(text)
    } else {
        text.to_string()
    }
}

/// Apply header color unconditionally (caller decides whether to use this).
pub(crate) fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(codes::HEADER), text, RESET)
}

/// Apply muted color unconditionally (caller decides whether to use this).
pub(crate) fn apply_muted(text: &str) -> String {
    format!("{}{}{}", fg256(codes::MUTED), text, RESET)
}

/// Colorize a session state string by its class.
///
/// - Green: running (a live agent)
/// - Yellow: provisioning, launching, stopping, stopped (in transit or done)
/// - Red: failed
/// - Muted: unknown (backend could not be asked)
///
/// Uses first-word matching so compound states like "failed: reason" are
/// colored correctly.
pub(crate) fn apply_status(text: &str) -> String {
    let lower = text.trim_start().to_lowercase();
    let first_word = lower
        .split(|c: char| !c.is_alphabetic())
        .next()
        .unwrap_or("");
    let code = match first_word {
        "running" => "\x1b[32m".to_string(),
        "provisioning" | "launching" | "stopping" | "stopped" => "\x1b[33m".to_string(),
        "failed" => "\x1b[31m".to_string(),
        "unknown" => fg256(codes::MUTED),
        _ => return text.to_string(),
    };
    format!("{code}{text}{RESET}")
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
