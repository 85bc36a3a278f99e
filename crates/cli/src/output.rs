// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a peek frame with box-drawing characters around pane output.
pub fn print_peek_frame(name: &str, output: &str) {
    print!("{}", peek_frame(name, output));
}

fn peek_frame(name: &str, output: &str) -> String {
    let mut frame = format!(
        "╭────── {} ──────\n",
        crate::color::header(&format!("peek: {}", name))
    );
    frame.push_str(output);
    if !output.is_empty() && !output.ends_with('\n') {
        frame.push('\n');
    }
    frame.push_str(&format!(
        "╰────── {} ──────\n",
        crate::color::header("end peek")
    ));
    frame
}
