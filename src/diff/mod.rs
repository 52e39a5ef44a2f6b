//! Diff engine: git CLI wrapper, change set resolution, unified diff
//! parsing, and size-based summarization.

pub mod git;
pub mod parser;
pub mod resolver;
pub mod summary;

use thiserror::Error;

/// Errors from the diff engine.
#[derive(Error, Debug)]
pub enum DiffError {
    #[error("git command failed: {0}")]
    GitError(String),

    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("diff parse error: {0}")]
    ParseError(String),

    #[error("branch '{branch}' not found locally or on the remote")]
    BranchNotFound {
        branch: String,
        available: Vec<String>,
    },
}

impl DiffError {
    /// Remediation hints shown below the error line.
    pub fn hints(&self) -> Vec<String> {
        match self {
            DiffError::BranchNotFound { available, .. } => {
                let mut hints = vec!["Available branches:".to_string()];
                if available.is_empty() {
                    hints.push("  (none)".to_string());
                }
                hints.extend(available.iter().map(|b| format!("  {b}")));
                hints.push("Tip: run `git fetch` to update remote-tracking branches.".to_string());
                hints
            }
            DiffError::NotARepository(_) => {
                vec!["Run this command from inside a git repository, or pass --path.".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
