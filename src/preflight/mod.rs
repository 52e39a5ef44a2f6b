//! Environment checks that must pass before any diff work starts.
//!
//! Checks run in a fixed order and the first failure stops the run:
//! repository, tools on `PATH`, project id, auth probe, clean working tree.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Config;
use crate::constants::ENV_PROJECT_ID;
use crate::diff::git;
use crate::diff::DiffError;
use crate::env::Env;
use crate::providers::AiRunner;

/// A failed precondition. Always terminal for the invocation.
#[derive(Error, Debug)]
pub enum PreconditionError {
    #[error("not a git repository: {0}")]
    NotARepository(String),

    #[error("required tool '{name}' was not found on PATH")]
    MissingDependency { name: String },

    #[error("no cloud project configured")]
    MissingProjectId,

    #[error("AI CLI authentication check failed")]
    AuthFailed { output: String },

    #[error("working tree has uncommitted changes")]
    UncommittedChanges { files: Vec<String> },

    #[error(transparent)]
    Git(#[from] DiffError),
}

impl PreconditionError {
    /// Remediation hints shown below the error line.
    pub fn hints(&self) -> Vec<String> {
        match self {
            PreconditionError::NotARepository(_) => {
                vec!["Run this command from inside a git repository, or pass --path.".to_string()]
            }
            PreconditionError::MissingDependency { name } if name == "git" => {
                vec!["Install git and make sure it is on your PATH.".to_string()]
            }
            PreconditionError::MissingDependency { name } => vec![
                format!("Install '{name}' and make sure it is on your PATH."),
                "Or point [ai] command in the config file at the executable.".to_string(),
            ],
            PreconditionError::MissingProjectId => vec![
                format!("Set {ENV_PROJECT_ID}, or run `gemini-review --setup`."),
                "Or add `[project] id = \"...\"` to .gemini-review.toml.".to_string(),
            ],
            PreconditionError::AuthFailed { output } => {
                let mut hints = Vec::new();
                let first = output.lines().map(str::trim).find(|l| !l.is_empty());
                if let Some(line) = first {
                    hints.push(format!("AI CLI said: {line}"));
                }
                hints.push("Run the AI CLI once interactively to log in, then retry.".to_string());
                hints
            }
            PreconditionError::UncommittedChanges { files } => {
                let mut hints = vec!["Commit or stash these files first:".to_string()];
                hints.extend(files.iter().map(|f| format!("  {f}")));
                hints
            }
            PreconditionError::Git(e) => e.hints(),
        }
    }
}

/// Resolve the repository top-level directory containing `dir`.
pub async fn check_repository(dir: &Path) -> Result<PathBuf, PreconditionError> {
    match git::find_repo_root(dir).await {
        Ok(root) => Ok(PathBuf::from(root)),
        Err(DiffError::NotARepository(msg)) => Err(PreconditionError::NotARepository(msg)),
        Err(e) => Err(e.into()),
    }
}

/// Check that each program resolves on `PATH`.
pub fn check_dependencies<'a>(
    env: &Env,
    programs: impl IntoIterator<Item = &'a str>,
) -> Result<(), PreconditionError> {
    for program in programs {
        match env.find_executable(program) {
            Some(path) => tracing::debug!(program, path = %path.display(), "dependency found"),
            None => {
                return Err(PreconditionError::MissingDependency {
                    name: program.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Send the probe prompt; a non-zero exit means the CLI is not logged in.
pub async fn check_auth(runner: &dyn AiRunner) -> Result<(), PreconditionError> {
    let output = runner
        .probe()
        .await
        .map_err(|e| PreconditionError::AuthFailed {
            output: e.to_string(),
        })?;
    if output.success {
        Ok(())
    } else {
        Err(PreconditionError::AuthFailed {
            output: output.text,
        })
    }
}

/// Fail when tracked files have uncommitted modifications.
pub async fn check_clean_tree(repo_root: &Path) -> Result<(), PreconditionError> {
    let files = git::uncommitted_changes(repo_root).await?;
    if files.is_empty() {
        Ok(())
    } else {
        Err(PreconditionError::UncommittedChanges { files })
    }
}

/// Run every check after the repository has been located.
pub async fn run_checks(
    repo_root: &Path,
    config: &Config,
    env: &Env,
    runner: &dyn AiRunner,
) -> Result<(), PreconditionError> {
    let mut programs = vec!["git"];
    programs.extend(runner.executable());
    check_dependencies(env, programs)?;

    config.validate()?;

    if config.ai.auth_probe {
        check_auth(runner).await?;
    } else {
        tracing::debug!("auth probe disabled by config");
    }

    check_clean_tree(repo_root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::git::test_repo;
    use crate::providers::{AiOutput, ProviderError};
    use async_trait::async_trait;

    struct FixedProbe(bool);

    #[async_trait]
    impl AiRunner for FixedProbe {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn run(&self, _prompt: &str) -> Result<AiOutput, ProviderError> {
            Ok(AiOutput {
                text: "Error: please log in\n".into(),
                success: self.0,
            })
        }
    }

    #[test]
    fn uncommitted_hint_lists_files() {
        let err = PreconditionError::UncommittedChanges {
            files: vec!["a.go".into(), "b.go".into()],
        };
        assert_eq!(
            err.hints(),
            vec!["Commit or stash these files first:", "  a.go", "  b.go"]
        );
    }

    #[test]
    fn missing_project_hint_mentions_env_var() {
        let hints = PreconditionError::MissingProjectId.hints();
        assert!(hints[0].contains("GOOGLE_CLOUD_PROJECT"));
    }

    #[test]
    fn missing_dependency_is_reported_by_name() {
        let env = Env::mock([("PATH", "/nonexistent-dir")]);
        let err = check_dependencies(&env, ["gemini"]).unwrap_err();
        assert!(
            matches!(err, PreconditionError::MissingDependency { ref name } if name == "gemini")
        );
    }

    #[tokio::test]
    async fn auth_probe_failure_keeps_output() {
        let err = check_auth(&FixedProbe(false)).await.unwrap_err();
        match &err {
            PreconditionError::AuthFailed { output } => assert!(output.contains("log in")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.hints()[0].contains("please log in"));
        assert!(check_auth(&FixedProbe(true)).await.is_ok());
    }

    #[tokio::test]
    async fn not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_repository(dir.path()).await.unwrap_err();
        assert!(matches!(err, PreconditionError::NotARepository(_)));
    }

    #[tokio::test]
    async fn dirty_tree_is_rejected_and_untracked_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        test_repo::init(dir.path());
        test_repo::commit_file(dir.path(), "a.go", "package a\n", "init");

        std::fs::write(dir.path().join("untracked.txt"), "x").unwrap();
        assert!(check_clean_tree(dir.path()).await.is_ok());

        std::fs::write(dir.path().join("a.go"), "package b\n").unwrap();
        let err = check_clean_tree(dir.path()).await.unwrap_err();
        assert!(
            matches!(err, PreconditionError::UncommittedChanges { ref files } if files == &vec!["a.go".to_string()])
        );
    }

    #[tokio::test]
    async fn checks_stop_at_missing_project_id() {
        let dir = tempfile::tempdir().unwrap();
        test_repo::init(dir.path());
        test_repo::commit_file(dir.path(), "a.go", "package a\n", "init");

        let config = Config::default();
        let err = run_checks(dir.path(), &config, &Env::real(), &FixedProbe(true))
            .await
            .unwrap_err();
        assert!(matches!(err, PreconditionError::MissingProjectId));
    }
}
