//! Markdown report file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::constants::{APP_NAME, VERSION};
use crate::models::ReviewReport;
use crate::output::cleanup::clean_for_file;
use crate::output::OutputRenderer;

/// Errors writing the report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Default report filename for the given time, `code-review-YYYYMMDD-HHMMSS.md`.
pub fn default_report_name(now: DateTime<Local>) -> String {
    format!("code-review-{}.md", now.format("%Y%m%d-%H%M%S"))
}

/// Timestamp format used in the report header.
pub fn format_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Fixed-layout markdown document.
pub struct MarkdownRenderer;

impl OutputRenderer for MarkdownRenderer {
    fn render(&self, report: &ReviewReport) -> String {
        let mut out = String::new();
        out.push_str("# Code Review Report\n\n");

        out.push_str(&format!("- **Project:** {}\n", report.project_name));
        out.push_str(&format!("- **Branch:** {}\n", report.current_branch));
        out.push_str(&format!("- **Target:** {}\n", report.target_branch));
        out.push_str(&format!(
            "- **Commit:** {} - {}\n",
            report.commit_hash, report.commit_message
        ));
        out.push_str(&format!("- **Author:** {}\n", report.author));
        out.push_str(&format!("- **Date:** {}\n", report.timestamp));
        out.push_str(&format!("- **Files changed:** {}\n", report.changed_files.len()));
        out.push_str(&format!("- **Tool version:** {APP_NAME} {VERSION}\n\n"));

        out.push_str("## Changed Files\n\n```\n");
        for path in &report.changed_files {
            out.push_str(path);
            out.push('\n');
        }
        out.push_str("```\n\n");

        out.push_str("## Analysis\n\n");
        out.push_str(&clean_for_file(&report.body));
        out.push_str("\n---\n\n");
        out.push_str(&format!(
            "*Generated by {APP_NAME} {VERSION} using the Gemini CLI.*\n"
        ));
        out
    }
}

/// Write the report to `path`, replacing any existing file.
pub fn write_report(path: &Path, report: &ReviewReport) -> Result<(), ReportError> {
    let content = MarkdownRenderer.render(report);
    std::fs::write(path, content).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ReviewReport {
        ReviewReport {
            project_name: "billing-api".into(),
            current_branch: "feature/users".into(),
            target_branch: "main".into(),
            commit_hash: "abc1234".into(),
            commit_message: "Add users endpoint".into(),
            author: "Jane Dev".into(),
            timestamp: "2026-03-04 05:06:07".into(),
            changed_files: vec!["modules/user/handler.go".into(), "go.mod".into()],
            body: "\n**1. Changes**\n- `router.Post` added\n\n\n2. Impact\n".into(),
        }
    }

    #[test]
    fn default_name_uses_local_timestamp() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(default_report_name(now), "code-review-20260304-050607.md");
        assert_eq!(format_timestamp(now), "2026-03-04 05:06:07");
    }

    #[test]
    fn render_has_metadata_files_and_body() {
        let doc = MarkdownRenderer.render(&sample());
        assert!(doc.starts_with("# Code Review Report\n"));
        assert!(doc.contains("- **Project:** billing-api\n"));
        assert!(doc.contains("- **Commit:** abc1234 - Add users endpoint\n"));
        assert!(doc.contains("- **Author:** Jane Dev\n"));
        assert!(doc.contains("- **Files changed:** 2\n"));
        assert!(doc.contains("```\nmodules/user/handler.go\ngo.mod\n```\n"));
        assert!(doc.contains("## Analysis\n\n1. Changes\n- router.Post added\n\n2. Impact\n"));
        assert!(doc.trim_end().ends_with("using the Gemini CLI.*"));
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.md");
        std::fs::write(&path, "old content").unwrap();

        write_report(&path, &sample()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old content"));
        assert!(content.contains("billing-api"));
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("review.md");
        let err = write_report(&path, &sample()).unwrap_err();
        assert!(err.to_string().contains("failed to write report"));
    }
}
