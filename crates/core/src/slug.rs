// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slugify task prompts into session and branch name components.

/// Filler words dropped from derived names so that "fix the login button"
/// becomes `fix-login-button` rather than `fix-the-login-button`.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "is", "are", "was", "be", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "into", "and", "but", "or", "not", "so", "that", "this", "it", "its", "please",
];

/// Maximum length of a derived session name.
pub const MAX_NAME_LEN: usize = 32;

/// Slugify a string for use as a session or branch name component.
///
/// Lowercases, replaces runs of non-alphanumeric characters with single
/// hyphens, drops stop words, and truncates to `max_len` without leaving a
/// trailing hyphen. Falls back to the unfiltered words when stop-word
/// filtering would empty the result ("do it" stays `do-it`).
pub fn slugify(input: &str, max_len: usize) -> String {
    let lower = input.to_lowercase();

    let mut words: Vec<&str> = Vec::new();
    for word in lower.split(|c: char| !c.is_ascii_alphanumeric()) {
        if !word.is_empty() {
            words.push(word);
        }
    }

    let kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();
    let joined = if kept.is_empty() {
        words.join("-")
    } else {
        kept.join("-")
    };

    let mut slug = joined;
    if slug.len() > max_len {
        slug.truncate(max_len);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Derive a session name from the task prompt, falling back to the agent
/// kind for prompts with no usable characters.
pub fn derive_session_name(prompt: &str, agent: &str) -> String {
    let slug = slugify(prompt, MAX_NAME_LEN);
    if !slug.is_empty() {
        return slug;
    }
    let fallback = slugify(agent, MAX_NAME_LEN);
    if fallback.is_empty() {
        "session".to_string()
    } else {
        fallback
    }
}

#[cfg(test)]
#[path = "slug_tests.rs"]
mod tests;
