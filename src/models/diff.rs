//! Diff-related types: file diffs, hunks, and diff lines.

/// The type of a line in a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    /// Line exists only in the new version (added).
    Added,
    /// Line exists only in the old version (removed).
    Removed,
    /// Line is unchanged (context).
    Context,
}

/// A single line in a diff hunk.
#[derive(Debug, Clone)]
pub struct DiffLine {
    /// The type of change.
    pub line_type: DiffLineType,
    /// The content of the line (without the leading +/-/space).
    pub content: String,
}

/// A contiguous hunk within a file diff.
#[derive(Debug, Clone)]
pub struct Hunk {
    /// The lines in this hunk.
    pub lines: Vec<DiffLine>,
}

/// A diff for a single file.
#[derive(Debug, Clone)]
pub struct FileDiff {
    /// Path of the old file.
    pub old_path: String,
    /// Path of the new file.
    pub new_path: String,
    /// Whether this is a new file.
    pub is_new: bool,
    /// Whether this file was deleted.
    pub is_deleted: bool,
    /// The hunks in this diff.
    pub hunks: Vec<Hunk>,
    /// The file's section of the unified diff, from `diff --git` up to the
    /// next file header, verbatim.
    pub raw: String,
}

impl FileDiff {
    /// Returns the most relevant file path (new_path for non-deletes, old_path for deletes).
    pub fn path(&self) -> &str {
        if self.is_deleted {
            &self.old_path
        } else {
            &self.new_path
        }
    }

    /// Iterate the content of added lines across all hunks.
    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| l.line_type == DiffLineType::Added)
            .map(|l| l.content.as_str())
    }
}
