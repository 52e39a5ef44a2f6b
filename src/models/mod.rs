//! Shared types used across all modules.
//!
//! This module defines the core data structures for change sets, diff
//! presentations, endpoint evidence and review reports. Other modules
//! import from here rather than reaching into each other's internals.

pub mod change;
pub mod diff;
pub mod report;

use clap::ValueEnum;
use strum::{Display, EnumIter, IntoEnumIterator};

pub use change::{ChangeSet, CommitInfo, HeadCommit};
pub use diff::FileDiff;
pub use report::{DiffPresentation, EndpointEvidence, FileExcerpt, ReviewReport};

/// Output language for the review, selected with `--language`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Vi,
    Zh,
    Ja,
    Ko,
    Fr,
    De,
    Es,
    Pt,
}

impl Language {
    /// English name of the language, as used in the translation instruction.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::Vi => "Vietnamese",
            Language::Zh => "Chinese",
            Language::Ja => "Japanese",
            Language::Ko => "Korean",
            Language::Fr => "French",
            Language::De => "German",
            Language::Es => "Spanish",
            Language::Pt => "Portuguese",
        }
    }

    /// The language's own name for itself.
    pub fn native_name(self) -> &'static str {
        match self {
            Language::Vi => "Tiếng Việt",
            Language::Zh => "中文",
            Language::Ja => "日本語",
            Language::Ko => "한국어",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::Es => "Español",
            Language::Pt => "Português",
        }
    }

    /// Fixed instruction appended to the prompt to request a translated review.
    pub fn translation_instruction(self) -> String {
        format!(
            "IMPORTANT: Write the entire review in {} ({}). Keep the section numbering, \
             code identifiers, file paths, API routes and technical terms in their original form.",
            self.english_name(),
            self.native_name(),
        )
    }
}

/// The five sections the AI is instructed to produce, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ReviewSection {
    #[strum(to_string = "Changes")]
    Changes,
    #[strum(to_string = "Impact")]
    Impact,
    #[strum(to_string = "Clean code")]
    CleanCode,
    #[strum(to_string = "Performance")]
    Performance,
    #[strum(to_string = "Other")]
    Other,
}

impl ReviewSection {
    /// 1-based position in the output contract.
    pub fn number(self) -> usize {
        ReviewSection::iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Heading text, e.g. `1. Changes`.
    pub fn heading(self) -> String {
        format!("{}. {}", self.number(), self)
    }
}
