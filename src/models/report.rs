//! Pipeline value types: diff presentation, endpoint evidence, and the saved report.

use crate::constants::NO_API_CHANGES;

/// A truncated diff excerpt for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileExcerpt {
    pub path: String,
    /// At most `excerpt_lines` lines of the file's diff.
    pub diff: String,
}

/// How the diff is presented to the AI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffPresentation {
    /// The complete unified diff.
    Full(String),
    /// Aggregate statistics plus the first few files' excerpts.
    Summarized {
        stats: String,
        excerpts: Vec<FileExcerpt>,
    },
}

impl DiffPresentation {
    pub fn is_summarized(&self) -> bool {
        matches!(self, DiffPresentation::Summarized { .. })
    }

    /// Render as the text block embedded in the prompt.
    pub fn render(&self) -> String {
        match self {
            DiffPresentation::Full(diff) => diff.clone(),
            DiffPresentation::Summarized { stats, excerpts } => {
                let mut out = String::new();
                out.push_str("=== DIFF STATISTICS ===\n");
                out.push_str(stats.trim_end());
                out.push_str("\n\n");
                out.push_str(&format!(
                    "=== SAMPLE CHANGES (first {} files) ===\n",
                    excerpts.len()
                ));
                for excerpt in excerpts {
                    out.push_str(&format!("\n--- File: {} ---\n", excerpt.path));
                    out.push_str(excerpt.diff.trim_end());
                    out.push('\n');
                }
                out
            }
        }
    }
}

/// Evidence of HTTP endpoint changes extracted from the diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointEvidence {
    /// A report with one or more populated sections.
    Found(String),
    /// Nothing route-related was added.
    NoneDetected,
}

impl EndpointEvidence {
    /// Report text, or `None` when nothing was detected.
    pub fn evidence(&self) -> Option<&str> {
        match self {
            EndpointEvidence::Found(text) => Some(text),
            EndpointEvidence::NoneDetected => None,
        }
    }

    /// Text form: the report, or the fixed "no changes" sentinel.
    pub fn as_text(&self) -> &str {
        self.evidence().unwrap_or(NO_API_CHANGES)
    }
}

/// Everything written to the markdown report file.
#[derive(Debug, Clone)]
pub struct ReviewReport {
    /// Basename of the repository top-level directory.
    pub project_name: String,
    pub current_branch: String,
    pub target_branch: String,
    /// Short hash of `HEAD`.
    pub commit_hash: String,
    /// Subject of `HEAD`.
    pub commit_message: String,
    /// Author name of `HEAD`.
    pub author: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
    pub changed_files: Vec<String>,
    /// AI analysis after noise filtering and markdown softening.
    pub body: String,
}
