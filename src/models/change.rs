//! Change set types produced by the resolver.

/// A commit between the merge base and `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// Abbreviated commit hash.
    pub short_hash: String,
    /// First line of the commit message.
    pub subject: String,
}

impl CommitInfo {
    /// One-line summary, `<hash> <subject>`.
    pub fn summary_line(&self) -> String {
        format!("{} {}", self.short_hash, self.subject)
    }
}

/// Metadata of the commit checked out at `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCommit {
    pub short_hash: String,
    pub author: String,
    pub subject: String,
}

/// The resolved comparison between `HEAD` and the target branch.
///
/// Built once by [`crate::diff::resolver::resolve_change_set`] and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct ChangeSet {
    /// Branch checked out at `HEAD` (`HEAD` when detached).
    pub current_branch: String,
    /// Branch name given with `--target`.
    pub target_branch: String,
    /// The ref the target resolved to (`origin/main` or `main`).
    pub target_ref: String,
    /// Comparison base: the merge base, or `target_ref` when none exists.
    pub merge_base: String,
    /// Whether `merge_base` fell back to `target_ref`.
    pub degraded: bool,
    /// Changed paths, in git's native diff order.
    pub changed_files: Vec<String>,
    /// Unified diff of `merge_base...HEAD`.
    pub raw_diff: String,
    /// `git diff --stat` output for the same range.
    pub stats: String,
    /// Commits reachable from `HEAD` but not from the merge base.
    pub commits: Vec<CommitInfo>,
}

impl ChangeSet {
    /// Returns `true` when there is nothing to review.
    pub fn is_empty(&self) -> bool {
        self.changed_files.is_empty()
    }
}
