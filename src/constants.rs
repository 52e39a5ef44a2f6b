//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and fixed pipeline thresholds so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "gemini-review";

/// Crate version, embedded in report metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.gemini-review.toml` in repo root).
pub const CONFIG_FILENAME: &str = ".gemini-review.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "gemini-review";

/// Default external AI command.
pub const DEFAULT_AI_COMMAND: &str = "gemini";

/// Default remote consulted for remote-tracking branches.
pub const DEFAULT_REMOTE: &str = "origin";

// ── Diff size thresholds ────────────────────────────────────────────

/// Above this many changed files the diff is summarized.
pub const MAX_FULL_DIFF_FILES: usize = 50;

/// Above this many changed lines the diff is summarized.
pub const MAX_FULL_DIFF_LINES: usize = 2000;

/// Number of per-file excerpts included in a summarized diff.
pub const EXCERPT_FILES: usize = 10;

/// Maximum lines per excerpt in a summarized diff.
pub const EXCERPT_LINES: usize = 50;

// ── Endpoint extraction ─────────────────────────────────────────────

/// Returned by the endpoint extractor when nothing route-related changed.
pub const NO_API_CHANGES: &str = "No API changes detected in modules folder";

// ── Environment variable names ──────────────────────────────────────

pub const ENV_PROJECT_ID: &str = "GOOGLE_CLOUD_PROJECT";
pub const ENV_AI_COMMAND: &str = "GEMINI_REVIEW_AI_COMMAND";
pub const ENV_REMOTE: &str = "GEMINI_REVIEW_REMOTE";
