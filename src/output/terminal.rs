//! Terminal renderer: colors the review's section headers and keyword labels.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use crate::models::ReviewReport;
use crate::output::cleanup::clean_for_terminal;
use crate::output::OutputRenderer;

/// `1. Changes` through `5. Other`, optionally behind `#` markers.
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*#*\s*[1-5]\.\s*(Changes|Impact|Clean code|Performance|Other)\b").unwrap()
});

/// Labels highlighted inside sections.
pub const KEYWORD_LABELS: &[&str] = &[
    "Security",
    "Testing",
    "Documentation",
    "Suggestions",
    "Suggestion",
    "Recommendations",
    "Recommendation",
    "Breaking changes",
    "Risks",
    "Risk",
    "Note",
];

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let labels = KEYWORD_LABELS.join("|");
    Regex::new(&format!(r"^\s*(?:[-*•]\s*)?({labels}):\s*(.*)$")).unwrap()
});

/// How a single line of the review is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    Section(&'a str),
    Keyword { label: &'a str, rest: &'a str },
    Plain(&'a str),
}

/// Classify one line of cleaned review text.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if SECTION_RE.is_match(line) {
        return LineKind::Section(line.trim().trim_start_matches('#').trim_start());
    }
    if let Some(caps) = KEYWORD_RE.captures(line) {
        if let (Some(label), Some(rest)) = (caps.get(1), caps.get(2)) {
            return LineKind::Keyword {
                label: label.as_str(),
                rest: rest.as_str(),
            };
        }
    }
    LineKind::Plain(line)
}

/// Colorize cleaned review text line by line, keeping line order.
pub fn colorize(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for line in text.lines() {
        match classify_line(line) {
            LineKind::Section(heading) => {
                output.push_str(&format!("{} {}\n", "▶".cyan().bold(), heading.cyan().bold()));
            }
            LineKind::Keyword { label, rest } => {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "•".yellow(),
                    format!("{label}:").yellow().bold(),
                    rest
                ));
            }
            LineKind::Plain(plain) => {
                output.push_str(plain);
                output.push('\n');
            }
        }
    }
    output
}

/// Terminal output renderer with colored section headers.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, report: &ReviewReport) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} {} {} {}\n",
            "Code review:".bold(),
            report.current_branch.bold(),
            "→".cyan(),
            report.target_branch.bold()
        ));
        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&colorize(&clean_for_terminal(&report.body)));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_headers_are_recognized() {
        assert_eq!(classify_line("1. Changes"), LineKind::Section("1. Changes"));
        assert_eq!(classify_line("## 3. Clean code"), LineKind::Section("3. Clean code"));
        assert_eq!(classify_line("  5. other notes"), LineKind::Section("5. other notes"));
        assert_eq!(classify_line("6. Changes"), LineKind::Plain("6. Changes"));
        assert_eq!(classify_line("Changes were made"), LineKind::Plain("Changes were made"));
    }

    #[test]
    fn keyword_labels_are_recognized() {
        assert_eq!(
            classify_line("- Security: token is logged"),
            LineKind::Keyword {
                label: "Security",
                rest: "token is logged"
            }
        );
        assert_eq!(
            classify_line("Testing: add a handler test"),
            LineKind::Keyword {
                label: "Testing",
                rest: "add a handler test"
            }
        );
        assert_eq!(classify_line("Insecurity: no"), LineKind::Plain("Insecurity: no"));
    }

    #[test]
    fn colorize_adds_markers_and_keeps_order() {
        let text = "1. Changes\n- added route\nSecurity: ok\n2. Impact\n";
        let out = colorize(text);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains('▶') && lines[0].contains("1. Changes"));
        assert_eq!(lines[1], "- added route");
        assert!(lines[2].contains('•') && lines[2].contains("Security:"));
        assert!(lines[3].contains('▶') && lines[3].contains("2. Impact"));
    }

    #[test]
    fn render_cleans_body_before_coloring() {
        let report = ReviewReport {
            project_name: "api".into(),
            current_branch: "feature".into(),
            target_branch: "main".into(),
            commit_hash: "abc1234".into(),
            commit_message: "msg".into(),
            author: "Dev".into(),
            timestamp: "2026-01-01 00:00:00".into(),
            changed_files: vec![],
            body: "Loaded cached credentials.\n**1. Changes**\n".into(),
        };
        let out = TerminalRenderer.render(&report);
        assert!(!out.contains("Loaded cached credentials"));
        assert!(!out.contains("**"));
        assert!(out.contains('▶'));
        assert!(out.contains("feature"));
    }
}
