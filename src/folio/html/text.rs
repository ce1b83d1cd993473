//! Cleanup of raw DOM text nodes.
//!
//! Editing surfaces scatter zero-width spaces around the caret, keep the newlines of the source
//! markup, and pad with runs of spaces. None of that is content.

use once_cell::sync::Lazy;
use regex::Regex;

const ZERO_WIDTH_SPACE: char = '\u{200B}';

static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Drops U+200B and `\n`, then collapses every run of two or more spaces into one.
///
/// Other whitespace (tabs, non-breaking spaces) is left alone.
pub fn normalize_text(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != ZERO_WIDTH_SPACE && *c != '\n')
        .collect();
    SPACE_RUN.replace_all(&stripped, " ").into_owned()
}
