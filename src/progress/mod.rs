//! Status lines for each pipeline stage.
//!
//! Written to stderr so stdout carries only the review. Silenced when
//! `enabled` is false; warnings are recorded either way.

use std::io::{self, Write};
use std::sync::Mutex;

use colored::Colorize;

/// Outcome of one stage, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    /// Stage started.
    Running,
    /// Stage completed.
    Done,
    /// Stage completed with a non-fatal problem.
    Warning,
    /// Informational note.
    Info,
}

/// Prints glyph-prefixed stage lines.
pub struct ProgressReporter {
    enabled: bool,
    warnings: Mutex<Vec<String>>,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            warnings: Mutex::new(Vec::new()),
        }
    }

    /// A reporter that prints nothing.
    pub fn silent() -> Self {
        Self::new(false)
    }

    pub fn running(&self, message: &str) {
        self.emit(StageStatus::Running, message);
    }

    pub fn done(&self, message: &str) {
        self.emit(StageStatus::Done, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(StageStatus::Info, message);
    }

    pub fn warn(&self, message: &str) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(message.to_string());
        }
        self.emit(StageStatus::Warning, message);
    }

    /// Warnings emitted so far.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().map(|w| w.clone()).unwrap_or_default()
    }

    fn emit(&self, status: StageStatus, message: &str) {
        if !self.enabled {
            return;
        }
        let line = format_line(&status, message);
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        let _ = writeln!(handle, "{line}");
        let _ = handle.flush();
    }
}

fn format_line(status: &StageStatus, message: &str) -> String {
    match status {
        StageStatus::Running => format!("  {} {}", "…".cyan(), message.dimmed()),
        StageStatus::Done => format!("  {} {}", "✔".green().bold(), message),
        StageStatus::Warning => format!("  {} {}", "⚠".yellow().bold(), message.yellow()),
        StageStatus::Info => format!("  {} {}", "ℹ".blue().bold(), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_are_recorded_when_silent() {
        let reporter = ProgressReporter::silent();
        reporter.done("resolved");
        reporter.warn("convention file not found");
        assert_eq!(reporter.warnings(), vec!["convention file not found"]);
    }

    #[test]
    fn lines_carry_status_glyphs() {
        assert!(format_line(&StageStatus::Done, "ok").contains('✔'));
        assert!(format_line(&StageStatus::Warning, "hm").contains('⚠'));
        assert!(format_line(&StageStatus::Info, "fyi").contains('ℹ'));
    }
}
