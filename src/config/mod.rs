//! Configuration loading and layering.
//!
//! Handles `.gemini-review.toml` loading, environment variable resolution,
//! and persisting the project id chosen during `--setup`.

pub mod loader;

pub use loader::{AiConfig, Config, ConfigError, EndpointsConfig, ReviewConfig};
