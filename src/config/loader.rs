//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.gemini-review.toml` in repo root
//! 4. `~/.config/gemini-review/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::{
    CONFIG_DIR, CONFIG_FILENAME, DEFAULT_AI_COMMAND, DEFAULT_REMOTE, ENV_AI_COMMAND,
    ENV_PROJECT_ID, ENV_REMOTE, EXCERPT_FILES, EXCERPT_LINES, MAX_FULL_DIFF_FILES,
    MAX_FULL_DIFF_LINES,
};
use crate::diff::summary::SummaryLimits;
use crate::env::Env;
use crate::preflight::PreconditionError;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub ai: AiConfig,
    pub review: ReviewConfig,
    pub endpoints: EndpointsConfig,
}

/// Cloud project used by the AI CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub id: Option<String>,
}

/// External AI command configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the prompt.
    pub args: Vec<String>,
    /// Probe authentication before each review.
    pub auth_probe: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_AI_COMMAND.to_string(),
            args: vec!["-p".to_string()],
            auth_probe: true,
        }
    }
}

/// Change set and diff size settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Remote consulted for remote-tracking target branches.
    pub remote: String,
    pub max_files: usize,
    pub max_lines: usize,
    pub excerpt_files: usize,
    pub excerpt_lines: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            max_files: MAX_FULL_DIFF_FILES,
            max_lines: MAX_FULL_DIFF_LINES,
            excerpt_files: EXCERPT_FILES,
            excerpt_lines: EXCERPT_LINES,
        }
    }
}

/// Where endpoint evidence is looked for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub modules_dir: String,
    pub extension: String,
    pub routes_file: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            modules_dir: "modules".to_string(),
            extension: "go".to_string(),
            routes_file: "routes.go".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, repo-local config, then applies
    /// environment variable overrides.
    pub fn load(repo_root: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: repo-local config
        if let Some(root) = repo_root {
            let local_path = root.join(CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Like [`Config::load`], but a file that cannot be read or parsed
    /// yields the defaults (plus environment overrides) and the error.
    pub fn load_or_default(repo_root: Option<&Path>, env: &Env) -> (Self, Option<ConfigError>) {
        match Self::load(repo_root, env) {
            Ok(config) => (config, None),
            Err(e) => {
                let mut config = Config::default();
                config.apply_env_vars(env);
                (config, Some(e))
            }
        }
    }

    /// Load a config from a specific file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR).join("config.toml"))
    }

    /// The configured project id, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.project.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Check that the settings a review needs are present.
    pub fn validate(&self) -> Result<&str, PreconditionError> {
        self.project_id().ok_or(PreconditionError::MissingProjectId)
    }

    /// Diff summarization limits.
    pub fn summary_limits(&self) -> SummaryLimits {
        SummaryLimits {
            max_files: self.review.max_files,
            max_lines: self.review.max_lines,
            excerpt_files: self.review.excerpt_files,
            excerpt_lines: self.review.excerpt_lines,
        }
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        if other.project.id.is_some() {
            self.project.id = other.project.id;
        }

        let default_ai = AiConfig::default();
        if other.ai.command != default_ai.command {
            self.ai.command = other.ai.command;
        }
        if other.ai.args != default_ai.args {
            self.ai.args = other.ai.args;
        }
        // Disabling the probe overrides enabling it.
        if !other.ai.auth_probe {
            self.ai.auth_probe = false;
        }

        let default_review = ReviewConfig::default();
        if other.review.remote != default_review.remote {
            self.review.remote = other.review.remote;
        }
        if other.review.max_files != default_review.max_files {
            self.review.max_files = other.review.max_files;
        }
        if other.review.max_lines != default_review.max_lines {
            self.review.max_lines = other.review.max_lines;
        }
        if other.review.excerpt_files != default_review.excerpt_files {
            self.review.excerpt_files = other.review.excerpt_files;
        }
        if other.review.excerpt_lines != default_review.excerpt_lines {
            self.review.excerpt_lines = other.review.excerpt_lines;
        }

        let default_endpoints = EndpointsConfig::default();
        if other.endpoints.modules_dir != default_endpoints.modules_dir {
            self.endpoints.modules_dir = other.endpoints.modules_dir;
        }
        if other.endpoints.extension != default_endpoints.extension {
            self.endpoints.extension = other.endpoints.extension;
        }
        if other.endpoints.routes_file != default_endpoints.routes_file {
            self.endpoints.routes_file = other.endpoints.routes_file;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Some(val) = env.non_empty(ENV_PROJECT_ID) {
            self.project.id = Some(val);
        }
        if let Some(val) = env.non_empty(ENV_AI_COMMAND) {
            self.ai.command = val;
        }
        if let Some(val) = env.non_empty(ENV_REMOTE) {
            self.review.remote = val;
        }
    }
}

/// Set `[project] id` in the TOML file at `path`, creating it if needed.
pub fn write_project_id(path: &Path, project_id: &str) -> Result<(), ConfigError> {
    let mut table: toml::Table = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        toml::Table::new()
    };

    let project = table
        .entry("project")
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    if !project.is_table() {
        *project = toml::Value::Table(toml::Table::new());
    }
    if let Some(project) = project.as_table_mut() {
        project.insert("id".to_string(), toml::Value::String(project_id.to_string()));
    }

    let write_err = |e: std::io::Error| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(path, table.to_string()).map_err(write_err)
}
