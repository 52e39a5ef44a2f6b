//! Runs the `gemini` command-line tool as a child process.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::AiConfig;
use crate::constants::ENV_PROJECT_ID;

use super::{AiOutput, AiRunner, ProviderError};

/// The AI CLI, invoked as `<command> <args...> <prompt>`.
#[derive(Debug, Clone)]
pub struct GeminiCli {
    command: String,
    args: Vec<String>,
    project_id: Option<String>,
}

impl GeminiCli {
    pub fn new(command: impl Into<String>, args: Vec<String>, project_id: Option<String>) -> Self {
        Self {
            command: command.into(),
            args,
            project_id,
        }
    }

    /// Build from the `[ai]` config section and the resolved project id.
    pub fn from_config(ai: &AiConfig, project_id: Option<&str>) -> Self {
        Self::new(ai.command.clone(), ai.args.clone(), project_id.map(str::to_string))
    }
}

#[async_trait]
impl AiRunner for GeminiCli {
    fn name(&self) -> &str {
        &self.command
    }

    fn executable(&self) -> Option<&str> {
        Some(self.command.as_str())
    }

    async fn run(&self, prompt: &str) -> Result<AiOutput, ProviderError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args).arg(prompt);
        if let Some(project) = &self.project_id {
            cmd.env(ENV_PROJECT_ID, project);
        }

        tracing::debug!(
            command = %self.command,
            prompt_bytes = prompt.len(),
            "invoking AI command"
        );

        let output = cmd.output().await.map_err(|e| ProviderError::Launch {
            command: self.command.clone(),
            source: e,
        })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        if !output.status.success() {
            tracing::warn!(
                command = %self.command,
                code = output.status.code().unwrap_or(-1),
                "AI command exited with non-zero status"
            );
        }

        Ok(AiOutput {
            text,
            success: output.status.success(),
        })
    }
}
