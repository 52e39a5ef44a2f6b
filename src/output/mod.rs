//! Output renderers: colored terminal text and the markdown report file.

pub mod cleanup;
pub mod report;
pub mod terminal;

use crate::models::ReviewReport;

/// Trait for rendering a review to an output format.
pub trait OutputRenderer {
    /// Render the review to a string.
    fn render(&self, report: &ReviewReport) -> String;
}
