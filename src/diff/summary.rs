//! Size-based diff summarization.
//!
//! Large change sets are replaced by their `--stat` output plus short
//! excerpts from the first few files, keeping the prompt to a practical size.

use std::sync::LazyLock;

use regex::Regex;

use super::parser::parse_unified_diff;
use crate::constants::{EXCERPT_FILES, EXCERPT_LINES, MAX_FULL_DIFF_FILES, MAX_FULL_DIFF_LINES};
use crate::models::{DiffPresentation, FileExcerpt};

static FILES_CHANGED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) files? changed").unwrap());

static LINES_CHANGED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) (?:insertion|deletion)").unwrap());

/// Counts parsed from the `git diff --stat` summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub files_changed: usize,
    /// The first insertions-or-deletions count on the summary line, not
    /// their sum.
    pub lines_changed: usize,
}

/// Thresholds and excerpt sizes for summarization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub max_files: usize,
    pub max_lines: usize,
    pub excerpt_files: usize,
    pub excerpt_lines: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_FULL_DIFF_FILES,
            max_lines: MAX_FULL_DIFF_LINES,
            excerpt_files: EXCERPT_FILES,
            excerpt_lines: EXCERPT_LINES,
        }
    }
}

impl DiffStats {
    /// Parse the last non-empty line of `git diff --stat` output.
    ///
    /// Counts that cannot be found parse as zero, so ambiguous stats
    /// favour sending the full diff.
    pub fn parse(stat_output: &str) -> Self {
        let summary = stat_output
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();

        let capture = |re: &Regex| -> usize {
            re.captures(summary)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };

        Self {
            files_changed: capture(&FILES_CHANGED_RE),
            lines_changed: capture(&LINES_CHANGED_RE),
        }
    }

    /// Strictly over either threshold.
    pub fn exceeds(&self, limits: &SummaryLimits) -> bool {
        self.files_changed > limits.max_files || self.lines_changed > limits.max_lines
    }
}

/// Choose between the full diff and a summary.
///
/// Excerpts follow `changed_files` order; each is the file's section of
/// `raw_diff` cut to `excerpt_lines` lines.
pub fn present_diff(
    raw_diff: &str,
    stat_output: &str,
    changed_files: &[String],
    limits: &SummaryLimits,
) -> DiffPresentation {
    let stats = DiffStats::parse(stat_output);
    if !stats.exceeds(limits) {
        return DiffPresentation::Full(raw_diff.to_string());
    }

    tracing::info!(
        files = stats.files_changed,
        lines = stats.lines_changed,
        "diff over size threshold, summarizing"
    );

    let sections = parse_unified_diff(raw_diff);
    let excerpts = changed_files
        .iter()
        .take(limits.excerpt_files)
        .map(|path| {
            let diff = sections
                .iter()
                .find(|f| f.path() == path.as_str() || f.old_path == *path)
                .map(|f| truncate_lines(&f.raw, limits.excerpt_lines))
                .unwrap_or_default();
            FileExcerpt {
                path: path.clone(),
                diff,
            }
        })
        .collect();

    DiffPresentation::Summarized {
        stats: stat_output.to_string(),
        excerpts,
    }
}

/// First `max` lines of `text`, newline-terminated.
fn truncate_lines(text: &str, max: usize) -> String {
    text.lines()
        .take(max)
        .map(|l| format!("{l}\n"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stat_line(files: usize, insertions: usize, deletions: usize) -> String {
        format!(
            " a.go | 2 +-\n {files} files changed, {insertions} insertions(+), {deletions} deletions(-)\n"
        )
    }

    #[test]
    fn parses_full_summary_line() {
        let stats = DiffStats::parse(&stat_line(3, 120, 7));
        assert_eq!(
            stats,
            DiffStats {
                files_changed: 3,
                lines_changed: 120
            }
        );
    }

    #[test]
    fn singular_forms_parse() {
        let stats = DiffStats::parse(" a.go | 1 +\n 1 file changed, 1 insertion(+)\n");
        assert_eq!(stats.files_changed, 1);
        assert_eq!(stats.lines_changed, 1);
    }

    #[test]
    fn deletions_only_uses_deletion_count() {
        let stats = DiffStats::parse(" 2 files changed, 40 deletions(-)\n");
        assert_eq!(stats.lines_changed, 40);
    }

    #[test]
    fn line_metric_is_first_match_not_sum() {
        // 10 insertions + 2500 deletions stays under the line threshold.
        let stats = DiffStats::parse(&stat_line(2, 10, 2500));
        assert_eq!(stats.lines_changed, 10);
        assert!(!stats.exceeds(&SummaryLimits::default()));
    }

    #[test]
    fn unparseable_stats_are_zero() {
        assert_eq!(DiffStats::parse("garbage"), DiffStats::default());
        assert_eq!(DiffStats::parse(""), DiffStats::default());
    }

    #[test]
    fn thresholds_are_strict() {
        let limits = SummaryLimits::default();
        let at = |files, lines| DiffStats {
            files_changed: files,
            lines_changed: lines,
        };
        assert!(!at(50, 0).exceeds(&limits));
        assert!(!at(0, 2000).exceeds(&limits));
        assert!(!at(50, 2000).exceeds(&limits));
        assert!(at(51, 0).exceeds(&limits));
        assert!(at(0, 2001).exceeds(&limits));
    }

    fn file_section(path: &str, added: usize) -> String {
        let mut s = format!(
            "diff --git a/{path} b/{path}\nindex 111..222 100644\n--- a/{path}\n+++ b/{path}\n@@ -0,0 +1,{added} @@\n"
        );
        for i in 0..added {
            s.push_str(&format!("+line {i}\n"));
        }
        s
    }

    #[test]
    fn small_diff_is_full() {
        let raw = file_section("a.go", 3);
        let p = present_diff(&raw, &stat_line(1, 3, 0), &["a.go".into()], &SummaryLimits::default());
        assert_eq!(p, DiffPresentation::Full(raw));
    }

    #[test]
    fn large_diff_is_summarized_with_bounded_excerpts() {
        let paths: Vec<String> = (0..60).map(|i| format!("pkg/f{i:02}.go")).collect();
        let raw: String = paths.iter().map(|p| file_section(p, 80)).collect();
        let stats = stat_line(60, 4800, 0);

        let p = present_diff(&raw, &stats, &paths, &SummaryLimits::default());
        let DiffPresentation::Summarized { stats: s, excerpts } = p else {
            panic!("expected summarized presentation");
        };
        assert_eq!(s, stats);
        assert_eq!(excerpts.len(), 10);
        for (excerpt, path) in excerpts.iter().zip(&paths) {
            assert_eq!(&excerpt.path, path);
            assert_eq!(excerpt.diff.lines().count(), 50);
            assert!(excerpt.diff.starts_with(&format!("diff --git a/{path}")));
        }
    }

    #[test]
    fn excerpt_shorter_than_limit_is_kept_whole() {
        assert_eq!(truncate_lines("a\nb\n", 50), "a\nb\n");
        assert_eq!(truncate_lines("a\nb\nc\n", 2), "a\nb\n");
    }
}
