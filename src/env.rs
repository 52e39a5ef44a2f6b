//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`].
//! Tests use [`Env::mock()`] backed by a `HashMap`, eliminating the need for
//! `unsafe` calls to [`std::env::set_var`] / [`std::env::remove_var`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable reader.
///
/// Wraps lookups so that production code hits `std::env` while tests
/// can supply a controlled set of values.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn mock(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Look up an environment variable by name.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var(name),
        }
    }

    /// Look up a variable, treating blank values as unset.
    pub fn non_empty(&self, name: &str) -> Option<String> {
        self.var(name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Directories listed in `PATH`, in search order.
    pub fn path_dirs(&self) -> Vec<PathBuf> {
        match self.var("PATH") {
            Ok(path) => std::env::split_paths(&path).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Resolve `program` against `PATH`, returning the first executable match.
    ///
    /// Names containing a path separator are checked as-is.
    pub fn find_executable(&self, program: &str) -> Option<PathBuf> {
        let direct = Path::new(program);
        if direct.components().count() > 1 {
            return is_executable(direct).then(|| direct.to_path_buf());
        }
        self.path_dirs()
            .into_iter()
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_env_reads_cargo_manifest_dir() {
        let env = Env::real();
        assert!(env.var("CARGO_MANIFEST_DIR").is_ok());
    }

    #[test]
    fn mock_env_returns_set_values() {
        let env = Env::mock([("FOO", "bar"), ("BAZ", "qux")]);
        assert_eq!(env.var("FOO").unwrap(), "bar");
        assert_eq!(env.var("BAZ").unwrap(), "qux");
    }

    #[test]
    fn mock_env_returns_not_present_for_missing() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        assert!(env.var("NONEXISTENT").is_err());
    }

    #[test]
    fn non_empty_trims_and_ignores_blank_values() {
        let env = Env::mock([("PRESENT", " value "), ("BLANK", "  ")]);
        assert_eq!(env.non_empty("PRESENT").as_deref(), Some("value"));
        assert_eq!(env.non_empty("BLANK"), None);
        assert_eq!(env.non_empty("ABSENT"), None);
    }

    #[cfg(unix)]
    #[test]
    fn find_executable_searches_path_in_order() {
        use std::os::unix::fs::PermissionsExt;

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let tool = second.path().join("mytool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path = std::env::join_paths([first.path(), second.path()]).unwrap();
        let env = Env::mock([("PATH", path.to_string_lossy().to_string())]);

        assert_eq!(env.find_executable("mytool"), Some(tool));
        assert_eq!(env.find_executable("missing-tool"), None);
    }

    #[cfg(unix)]
    #[test]
    fn find_executable_skips_non_executable_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plain"), "data").unwrap();
        let env = Env::mock([("PATH", dir.path().to_string_lossy().to_string())]);
        assert_eq!(env.find_executable("plain"), None);
    }
}
