//! Clap argument types and run mode resolution.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use gemini_review::models::Language;
use gemini_review::pipeline::SaveMode;

/// AI code review of the current branch against a target branch.
#[derive(Parser, Debug)]
#[command(
    name = "gemini-review",
    version = gemini_review::constants::VERSION,
    about = super::ABOUT_STYLED,
    disable_version_flag = true,
)]
pub struct Cli {
    /// Branch to compare against (remote-tracking branch preferred).
    #[arg(long, short = 't', required_unless_present_any = ["setup", "repair"])]
    pub target: Option<String>,

    /// Save the report to this file instead of code-review-<timestamp>.md.
    #[arg(long, value_name = "FILE", conflicts_with = "no_save")]
    pub save_to: Option<PathBuf>,

    /// Print the review without saving a report file.
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Team conventions file to check the changes against.
    #[arg(long, value_name = "FILE")]
    pub convention: Option<PathBuf>,

    /// Write the review in this language.
    #[arg(long, short = 'l', value_enum)]
    pub language: Option<Language>,

    /// Configure the cloud project and check authentication.
    #[arg(long, default_value_t = false, conflicts_with = "repair")]
    pub setup: bool,

    /// Diagnose the installation without changing anything.
    #[arg(long, default_value_t = false)]
    pub repair: bool,

    /// Path to the repository (default: current directory).
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Enable debug logging.
    #[arg(long, default_value_t = false)]
    pub verbose: bool,

    /// Print version.
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

/// What the invocation should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Setup,
    Repair,
    Review(String),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.setup {
            Mode::Setup
        } else if self.repair {
            Mode::Repair
        } else {
            // clap guarantees --target without --setup/--repair.
            Mode::Review(self.target.clone().unwrap_or_default())
        }
    }

    pub fn save_mode(&self) -> SaveMode {
        if self.no_save {
            SaveMode::Skip
        } else if let Some(path) = &self.save_to {
            SaveMode::To(path.clone())
        } else {
            SaveMode::Default
        }
    }
}
