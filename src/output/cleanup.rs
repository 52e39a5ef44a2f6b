//! Post-processing of raw AI output.
//!
//! The AI CLI prints connection chatter alongside the review, and its
//! markdown renders poorly in a plain terminal. Both are cleaned here.

use std::sync::LazyLock;

use regex::Regex;

/// Lines the AI CLI prints that are not part of the review.
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[IDEClient\]|IDE companion|Loaded cached credentials").unwrap()
});

/// Remove known noise lines.
pub fn filter_noise(text: &str) -> String {
    text.lines()
        .filter(|line| !NOISE_RE.is_match(line))
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Strip bold markers and inline-code backticks, and drop fence lines.
pub fn soften_markdown(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .map(|line| format!("{}\n", line.replace("**", "").replace('`', "")))
        .collect()
}

/// Collapse runs of blank lines to a single blank line.
pub fn squeeze_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        out.push_str(if blank { "" } else { line });
        out.push('\n');
    }
    out
}

/// Cleanup for terminal display.
pub fn clean_for_terminal(raw: &str) -> String {
    squeeze_blank_lines(&soften_markdown(&filter_noise(raw)))
}

/// Cleanup for the saved report: like the terminal variant, without
/// leading or trailing blank lines.
pub fn clean_for_file(raw: &str) -> String {
    let squeezed = clean_for_terminal(raw);
    let trimmed = squeezed.trim_matches('\n');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}\n")
    }
}
