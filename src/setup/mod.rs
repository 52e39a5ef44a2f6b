//! `--setup`: interactive first-time configuration.
//!
//! Asks for the cloud project id, stores it in the global config file and
//! checks that the AI CLI can authenticate with it.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::loader::write_project_id;
use crate::config::{Config, ConfigError};
use crate::preflight::{self, PreconditionError};
use crate::providers::gemini::GeminiCli;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a project id is required")]
    NoProjectId,
}

/// Auth probe result after saving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Ok,
    Failed(String),
    Skipped,
}

/// What setup did.
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub config_path: PathBuf,
    pub project_id: String,
    pub auth: AuthStatus,
}

/// Prompt for the project id. An empty answer keeps `current`.
pub fn prompt_project_id(
    input: &mut impl BufRead,
    output: &mut impl Write,
    current: Option<&str>,
) -> Result<String, SetupError> {
    match current {
        Some(id) => write!(output, "Google Cloud project id [{id}]: ")?,
        None => write!(output, "Google Cloud project id: ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    if !answer.is_empty() {
        Ok(answer.to_string())
    } else {
        current.map(str::to_string).ok_or(SetupError::NoProjectId)
    }
}

/// Run the setup flow against the config file at `config_path`.
pub async fn run_setup(
    input: &mut impl BufRead,
    output: &mut impl Write,
    config: &Config,
    config_path: &Path,
) -> Result<SetupOutcome, SetupError> {
    let project_id = prompt_project_id(input, output, config.project_id())?;
    write_project_id(config_path, &project_id)?;
    tracing::info!(path = %config_path.display(), "project id saved");

    let auth = if config.ai.auth_probe {
        let runner = GeminiCli::from_config(&config.ai, Some(&project_id));
        match preflight::check_auth(&runner).await {
            Ok(()) => AuthStatus::Ok,
            Err(PreconditionError::AuthFailed { output }) => AuthStatus::Failed(output),
            Err(e) => AuthStatus::Failed(e.to_string()),
        }
    } else {
        AuthStatus::Skipped
    };

    Ok(SetupOutcome {
        config_path: config_path.to_path_buf(),
        project_id,
        auth,
    })
}
