//! CLI argument parsing and console helpers.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

use colored::Colorize;

/// Help header with ANSI styling.
pub const ABOUT_STYLED: &str =
    "\x1b[1mgemini-review\x1b[0m \x1b[2m· AI code review of your branch using the Gemini CLI\x1b[0m";

/// Print a red error line to stderr and its hints to stdout.
pub fn print_error(message: &str, hints: &[String]) {
    eprintln!("  {} {}", "✖".red().bold(), message.red());
    for hint in hints {
        println!("    {}", hint.dimmed());
    }
}
