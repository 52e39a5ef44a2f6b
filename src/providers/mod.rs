//! AiRunner trait and the external AI CLI integration.
//!
//! The review step talks to the AI only through [`AiRunner`], so tests can
//! substitute a canned runner for the real `gemini` process.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

/// Prompt used to check that the AI CLI is authenticated.
pub const AUTH_PROBE_PROMPT: &str = "Reply with the single word OK.";

/// Errors from the AI runner.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("failed to launch AI command '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },
}

/// Captured result of one AI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiOutput {
    /// stdout followed by stderr.
    pub text: String,
    /// Whether the process exited with status zero.
    pub success: bool,
}

impl AiOutput {
    /// Successful output with the given text.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }
}

/// Runs a prompt through an AI backend.
///
/// Implementations return whatever the backend printed. A non-zero exit is
/// reported through [`AiOutput::success`], not as an error.
#[async_trait]
pub trait AiRunner: Send + Sync {
    /// Human-readable backend name, used in log and status lines.
    fn name(&self) -> &str;

    /// Program that must resolve on `PATH` for this runner to work.
    fn executable(&self) -> Option<&str> {
        None
    }

    /// Send `prompt` and capture the combined output.
    async fn run(&self, prompt: &str) -> Result<AiOutput, ProviderError>;

    /// Send a trivial prompt to check credentials.
    async fn probe(&self) -> Result<AiOutput, ProviderError> {
        self.run(AUTH_PROBE_PROMPT).await
    }
}
