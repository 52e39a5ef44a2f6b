//! The review pipeline.
//!
//! Stages run strictly in order and each consumes the previous stage's
//! output: preflight, change set, diff presentation, endpoint evidence,
//! prompt, AI call, report. The first error ends the run.

use std::path::{Path, PathBuf};

use chrono::Local;
use strum::Display;
use thiserror::Error;

use crate::config::Config;
use crate::diff::resolver::resolve_change_set;
use crate::diff::summary::present_diff;
use crate::diff::{git, DiffError};
use crate::endpoints::{extract_endpoints, EndpointRules};
use crate::env::Env;
use crate::models::{Language, ReviewReport};
use crate::output::report::{default_report_name, format_timestamp, write_report, ReportError};
use crate::preflight::{self, PreconditionError};
use crate::progress::ProgressReporter;
use crate::prompt::{compose_prompt, PromptInputs};
use crate::providers::{AiRunner, ProviderError};

/// Errors that end a review run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Broad class of a pipeline failure, used as the error line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FailureKind {
    #[strum(to_string = "Cannot start review")]
    Precondition,
    #[strum(to_string = "Review failed")]
    Execution,
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Precondition(_) => FailureKind::Precondition,
            PipelineError::Diff(DiffError::BranchNotFound { .. })
            | PipelineError::Diff(DiffError::NotARepository(_)) => FailureKind::Precondition,
            PipelineError::Diff(_) | PipelineError::Provider(_) | PipelineError::Report(_) => {
                FailureKind::Execution
            }
        }
    }

    /// Remediation hints shown below the error line.
    pub fn hints(&self) -> Vec<String> {
        match self {
            PipelineError::Precondition(e) => e.hints(),
            PipelineError::Diff(e) => e.hints(),
            PipelineError::Provider(_) => {
                vec!["Check the [ai] command setting or run with --repair.".to_string()]
            }
            PipelineError::Report(_) => vec![
                "The AI analysis was not saved. Choose another path with --save-to.".to_string(),
            ],
        }
    }
}

/// Where the report goes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveMode {
    /// `code-review-<timestamp>.md` in the working directory.
    #[default]
    Default,
    /// Explicit path from `--save-to`.
    To(PathBuf),
    /// `--no-save`.
    Skip,
}

/// Per-run options from the command line.
#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Directory inside the repository to review.
    pub repo_dir: PathBuf,
    /// Branch to compare against.
    pub target: String,
    pub save: SaveMode,
    /// Team convention file.
    pub convention: Option<PathBuf>,
    pub language: Option<Language>,
    /// Directory for the default report filename.
    pub work_dir: PathBuf,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone)]
pub enum ReviewOutcome {
    /// The branch has no differences from the target.
    NoChanges { current_branch: String, target_branch: String },
    /// The AI was consulted.
    Completed {
        report: ReviewReport,
        /// Path of the saved report, if one was written.
        report_path: Option<PathBuf>,
        /// Whether the diff was summarized.
        summarized: bool,
    },
}

/// Run the full review.
pub async fn run_review(
    options: &ReviewOptions,
    config: &Config,
    env: &Env,
    runner: &dyn AiRunner,
    progress: &ProgressReporter,
) -> Result<ReviewOutcome, PipelineError> {
    let repo_root = preflight::check_repository(&options.repo_dir).await?;
    preflight::run_checks(&repo_root, config, env, runner).await?;
    progress.done("environment checks passed");

    progress.running(&format!("comparing against {}", options.target));
    let change_set = resolve_change_set(&repo_root, &options.target, &config.review.remote).await?;
    if change_set.degraded {
        progress.warn(&format!(
            "no merge base with {}; reviewing the full difference",
            change_set.target_ref
        ));
    }
    if change_set.is_empty() {
        return Ok(ReviewOutcome::NoChanges {
            current_branch: change_set.current_branch,
            target_branch: change_set.target_branch,
        });
    }
    progress.done(&format!(
        "{} file(s) changed on {} since {}",
        change_set.changed_files.len(),
        change_set.current_branch,
        change_set.target_ref
    ));

    let presentation = present_diff(
        &change_set.raw_diff,
        &change_set.stats,
        &change_set.changed_files,
        &config.summary_limits(),
    );
    if presentation.is_summarized() {
        progress.info("large diff: sending statistics and excerpts");
    }

    let endpoints = extract_endpoints(&change_set.raw_diff, &EndpointRules::from(&config.endpoints));
    if endpoints.evidence().is_some() {
        progress.info("API endpoint changes detected");
    }

    let convention = match &options.convention {
        Some(path) => read_convention(path, progress).await,
        None => None,
    };

    let prompt = compose_prompt(&PromptInputs {
        current_branch: &change_set.current_branch,
        target_branch: &change_set.target_branch,
        commits: &change_set.commits,
        changed_files: &change_set.changed_files,
        convention: convention.as_deref(),
        endpoints: &endpoints,
        diff: &presentation,
        language: options.language,
    });
    tracing::debug!(bytes = prompt.len(), "prompt composed");

    progress.running(&format!("asking {} for a review", runner.name()));
    let output = runner.run(&prompt).await?;
    if !output.success {
        tracing::debug!("AI command reported failure; keeping its output");
    }

    let head = git::head_commit(&repo_root).await?;
    let now = Local::now();
    let report = ReviewReport {
        project_name: project_name(&repo_root),
        current_branch: change_set.current_branch,
        target_branch: change_set.target_branch,
        commit_hash: head.short_hash,
        commit_message: head.subject,
        author: head.author,
        timestamp: format_timestamp(now),
        changed_files: change_set.changed_files,
        body: output.text,
    };

    let report_path = match &options.save {
        SaveMode::Skip => None,
        SaveMode::To(path) => Some(path.clone()),
        SaveMode::Default => Some(options.work_dir.join(default_report_name(now))),
    };
    if let Some(path) = &report_path {
        write_report(path, &report)?;
    }

    Ok(ReviewOutcome::Completed {
        report,
        report_path,
        summarized: presentation.is_summarized(),
    })
}

/// Read the convention file; a missing or unreadable file is only a warning.
async fn read_convention(path: &Path, progress: &ProgressReporter) -> Option<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            progress.done(&format!("using conventions from {}", path.display()));
            Some(text)
        }
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "convention file unreadable");
            progress.warn(&format!(
                "convention file {} not found; continuing without it",
                path.display()
            ));
            None
        }
    }
}

/// Basename of the repository top-level directory.
fn project_name(repo_root: &Path) -> String {
    repo_root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo_root.display().to_string())
}
