//! Git CLI wrapper for repository queries.
//!
//! Shells out to `git` via `tokio::process::Command`. Every query is
//! read-only.

use std::path::Path;

use tracing::debug;

use super::DiffError;
use crate::models::{CommitInfo, HeadCommit};

/// Keeps non-ASCII paths verbatim in `--name-only`, `--stat` and diff headers.
const UNQUOTED_PATHS: [&str; 2] = ["-c", "core.quotePath=false"];

/// Run `git <args>` in `repo_root` and return stdout, failing on non-zero exit.
async fn run_git(repo_root: &Path, args: &[&str]) -> Result<String, DiffError> {
    debug!(?args, "running git");
    let output = tokio::process::Command::new("git")
        .args(UNQUOTED_PATHS)
        .args(args)
        .current_dir(repo_root)
        .output()
        .await
        .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffError::GitError(format!(
            "git {} failed ({}): {}",
            args.first().copied().unwrap_or_default(),
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run `git <args>` and report only whether it exited successfully.
async fn git_succeeds(repo_root: &Path, args: &[&str]) -> bool {
    tokio::process::Command::new("git")
        .args(args)
        .current_dir(repo_root)
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Find the root of the git repository containing `start_dir`.
pub async fn find_repo_root(start_dir: &Path) -> Result<String, DiffError> {
    let output = tokio::process::Command::new("git")
        .args(["rev-parse", "--show-toplevel"])
        .current_dir(start_dir)
        .output()
        .await
        .map_err(|e| DiffError::GitError(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiffError::NotARepository(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Name of the branch at `HEAD`, or `HEAD` when detached.
pub async fn current_branch(repo_root: &Path) -> Result<String, DiffError> {
    let out = run_git(repo_root, &["rev-parse", "--abbrev-ref", "HEAD"]).await?;
    Ok(out.trim().to_string())
}

/// Whether the fully-qualified ref (e.g. `refs/heads/main`) exists.
pub async fn ref_exists(repo_root: &Path, full_ref: &str) -> bool {
    git_succeeds(repo_root, &["show-ref", "--verify", "--quiet", full_ref]).await
}

/// Local and remote-tracking branch names, as `git branch -a` lists them.
pub async fn list_branches(repo_root: &Path) -> Result<Vec<String>, DiffError> {
    let out = run_git(repo_root, &["branch", "-a", "--format=%(refname:short)"]).await?;
    Ok(out
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.ends_with("/HEAD"))
        .map(String::from)
        .collect())
}

/// Merge base of `HEAD` and `other`, or `None` when git finds none.
pub async fn merge_base(repo_root: &Path, other: &str) -> Option<String> {
    match run_git(repo_root, &["merge-base", "HEAD", other]).await {
        Ok(out) => Some(out.trim().to_string()).filter(|s| !s.is_empty()),
        Err(e) => {
            debug!(error = %e, "merge-base failed");
            None
        }
    }
}

/// Paths changed in `range`, in git's diff order.
pub async fn changed_files(repo_root: &Path, range: &str) -> Result<Vec<String>, DiffError> {
    let out = run_git(repo_root, &["diff", "--no-color", "--name-only", range]).await?;
    Ok(out
        .lines()
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

/// Unified diff of `range`.
pub async fn git_diff(repo_root: &Path, range: &str) -> Result<String, DiffError> {
    run_git(
        repo_root,
        &[
            "diff",
            "--no-color",
            "--no-ext-diff",
            "--src-prefix=a/",
            "--dst-prefix=b/",
            range,
        ],
    )
    .await
}

/// `git diff --stat` of `range`.
pub async fn diff_stat(repo_root: &Path, range: &str) -> Result<String, DiffError> {
    run_git(repo_root, &["diff", "--no-color", "--stat", range]).await
}

/// Commits reachable from `HEAD` but not from `base`, newest first.
pub async fn commit_log(repo_root: &Path, base: &str) -> Result<Vec<CommitInfo>, DiffError> {
    let range = format!("{base}..HEAD");
    let out = run_git(repo_root, &["log", "--format=%h%x09%s", range.as_str()]).await?;
    Ok(out
        .lines()
        .filter_map(|line| {
            let (hash, subject) = line.split_once('\t')?;
            Some(CommitInfo {
                short_hash: hash.to_string(),
                subject: subject.to_string(),
            })
        })
        .collect())
}

/// Short hash, author name and subject of `HEAD`.
pub async fn head_commit(repo_root: &Path) -> Result<HeadCommit, DiffError> {
    let out = run_git(repo_root, &["log", "-1", "--format=%h%x09%an%x09%s"]).await?;
    let mut parts = out.trim_end_matches('\n').splitn(3, '\t');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(hash), Some(author), Some(subject)) if !hash.is_empty() => Ok(HeadCommit {
            short_hash: hash.to_string(),
            author: author.to_string(),
            subject: subject.to_string(),
        }),
        _ => Err(DiffError::ParseError(format!(
            "unexpected git log output: {out:?}"
        ))),
    }
}

/// Tracked files with staged or unstaged modifications.
///
/// Untracked files are ignored.
pub async fn uncommitted_changes(repo_root: &Path) -> Result<Vec<String>, DiffError> {
    let out = run_git(repo_root, &["status", "--porcelain", "--untracked-files=no"]).await?;
    Ok(out
        .lines()
        .filter(|l| l.len() > 3)
        .map(|l| l[3..].to_string())
        .collect())
}
