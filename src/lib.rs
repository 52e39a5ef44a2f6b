//! gemini-review — AI code review reports for git branches (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod diff;
pub mod doctor;
pub mod endpoints;
pub mod env;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod preflight;
pub mod progress;
pub mod prompt;
pub mod providers;
pub mod setup;
