//! Change set resolution: which ref to compare against, the merge base,
//! and everything git reports for `<base>...HEAD`.

use std::path::Path;

use tracing::{debug, warn};

use super::{git, DiffError};
use crate::models::ChangeSet;

/// Pick the comparison ref given which candidates exist.
///
/// The remote-tracking branch wins when both exist.
fn choose_target_ref(
    remote: &str,
    target: &str,
    remote_exists: bool,
    local_exists: bool,
) -> Option<String> {
    if remote_exists {
        Some(format!("{remote}/{target}"))
    } else if local_exists {
        Some(target.to_string())
    } else {
        None
    }
}

/// Revision range for the diff queries.
///
/// Three-dot normally; two-dot in degraded mode, since `A...B` needs a
/// merge base to exist.
fn compare_range(base: &str, degraded: bool) -> String {
    if degraded {
        format!("{base}..HEAD")
    } else {
        format!("{base}...HEAD")
    }
}

/// Resolve the change set of `HEAD` against `target`.
///
/// Fails with [`DiffError::BranchNotFound`] when neither
/// `refs/remotes/<remote>/<target>` nor `refs/heads/<target>` exists. When
/// git reports no merge base the target ref itself becomes the base, so the
/// diff covers the full difference rather than changes since divergence.
pub async fn resolve_change_set(
    repo_root: &Path,
    target: &str,
    remote: &str,
) -> Result<ChangeSet, DiffError> {
    let remote_exists = git::ref_exists(repo_root, &format!("refs/remotes/{remote}/{target}")).await;
    let local_exists = git::ref_exists(repo_root, &format!("refs/heads/{target}")).await;
    debug!(target, remote_exists, local_exists, "resolved target candidates");

    let Some(target_ref) = choose_target_ref(remote, target, remote_exists, local_exists) else {
        let available = git::list_branches(repo_root).await.unwrap_or_default();
        return Err(DiffError::BranchNotFound {
            branch: target.to_string(),
            available,
        });
    };

    let (merge_base, degraded) = match git::merge_base(repo_root, &target_ref).await {
        Some(base) => (base, false),
        None => {
            warn!(
                target_ref,
                "no merge base found; comparing against the branch tip instead"
            );
            (target_ref.clone(), true)
        }
    };

    let range = compare_range(&merge_base, degraded);
    let current_branch = git::current_branch(repo_root).await?;
    let changed_files = git::changed_files(repo_root, &range).await?;
    let raw_diff = git::git_diff(repo_root, &range).await?;
    let stats = git::diff_stat(repo_root, &range).await?;
    let commits = git::commit_log(repo_root, &merge_base).await?;

    debug!(
        files = changed_files.len(),
        commits = commits.len(),
        diff_bytes = raw_diff.len(),
        "change set resolved"
    );

    Ok(ChangeSet {
        current_branch,
        target_branch: target.to_string(),
        target_ref,
        merge_base,
        degraded,
        changed_files,
        raw_diff,
        stats,
        commits,
    })
}
