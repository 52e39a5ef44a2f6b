//! Unified diff format parser.
//!
//! Splits the output of `git diff` into per-file sections and parses each
//! into a [`FileDiff`]. The raw section text is kept alongside the parsed
//! hunks so excerpts and context windows can be cut from git's own output.

use crate::models::diff::{DiffLine, DiffLineType, FileDiff, Hunk};

/// Parse a unified diff string into a list of file diffs, in input order.
pub fn parse_unified_diff(input: &str) -> Vec<FileDiff> {
    split_sections(input)
        .into_iter()
        .map(parse_section)
        .collect()
}

/// Split a unified diff into one string slice per `diff --git` section.
///
/// Anything before the first header is discarded.
fn split_sections(input: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = Vec::new();
    let mut offset = 0;
    for line in input.split_inclusive('\n') {
        if line.starts_with("diff --git ") {
            starts.push(offset);
        }
        offset += line.len();
    }

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(input.len());
            &input[start..end]
        })
        .collect()
}

/// Parse one `diff --git` section.
fn parse_section(section: &str) -> FileDiff {
    let mut lines = section.lines().peekable();
    let header = lines.next().unwrap_or_default();
    let (mut old_path, mut new_path) = parse_diff_header(header);

    let mut is_new = false;
    let mut is_deleted = false;
    let mut hunks: Vec<Hunk> = Vec::new();

    while let Some(&next) = lines.peek() {
        if next.starts_with("new file mode") {
            is_new = true;
            lines.next();
        } else if next.starts_with("deleted file mode") {
            is_deleted = true;
            lines.next();
        } else if let Some(path) = next.strip_prefix("rename from ") {
            old_path = path.to_string();
            lines.next();
        } else if let Some(path) = next.strip_prefix("rename to ") {
            new_path = path.to_string();
            lines.next();
        } else if let Some(path) = next.strip_prefix("--- ") {
            if path != "/dev/null" {
                old_path = strip_diff_prefix(path).to_string();
            }
            lines.next();
        } else if let Some(path) = next.strip_prefix("+++ ") {
            if path != "/dev/null" {
                new_path = strip_diff_prefix(path).to_string();
            }
            lines.next();
        } else if next.starts_with("@@") {
            match parse_hunk(&mut lines) {
                Some(hunk) => hunks.push(hunk),
                None => break,
            }
        } else {
            // index, similarity, mode and binary lines
            lines.next();
        }
    }

    FileDiff {
        old_path,
        new_path,
        is_new,
        is_deleted,
        hunks,
        raw: section.to_string(),
    }
}

/// Parse the "diff --git a/path b/path" header line.
fn parse_diff_header(line: &str) -> (String, String) {
    let rest = line.strip_prefix("diff --git ").unwrap_or(line);

    // Paths may contain spaces, so locate the second prefix rather than
    // splitting on whitespace.
    if let Some(b_idx) = find_second_prefix(rest) {
        let old_path = strip_diff_prefix(&rest[..b_idx]).to_string();
        let new_path = strip_diff_prefix(&rest[b_idx + 1..]).to_string();
        (old_path, new_path)
    } else {
        let mut parts = rest.splitn(2, ' ');
        let old_path = strip_diff_prefix(parts.next().unwrap_or("")).to_string();
        let new_path = strip_diff_prefix(parts.next().unwrap_or("")).to_string();
        (old_path, new_path)
    }
}

/// Strip a single-character git diff prefix (`a/`, `b/`, `c/`, `w/`, `i/`, `o/`).
///
/// `c/`, `w/`, `i/` and `o/` appear when `diff.mnemonicPrefix` is enabled.
fn strip_diff_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 2
        && bytes[1] == b'/'
        && matches!(bytes[0], b'a' | b'b' | b'c' | b'w' | b'i' | b'o')
    {
        return &path[2..];
    }
    path
}

/// Find the position of the space before the second path prefix.
fn find_second_prefix(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len().saturating_sub(2)).find(|&i| {
        bytes[i] == b' '
            && bytes[i + 2] == b'/'
            && matches!(bytes[i + 1], b'a' | b'b' | b'c' | b'w' | b'i' | b'o')
    })
}

/// Parse a single hunk starting with an `@@` line.
fn parse_hunk(lines: &mut std::iter::Peekable<std::str::Lines<'_>>) -> Option<Hunk> {
    let header_line = lines.next()?;
    if !is_hunk_header(header_line) {
        return None;
    }

    let mut hunk_lines: Vec<DiffLine> = Vec::new();

    while let Some(&next) = lines.peek() {
        if next.starts_with("@@") {
            break;
        }
        lines.next();

        let (line_type, content) = if let Some(content) = next.strip_prefix('+') {
            (DiffLineType::Added, content)
        } else if let Some(content) = next.strip_prefix('-') {
            (DiffLineType::Removed, content)
        } else if let Some(content) = next.strip_prefix(' ') {
            (DiffLineType::Context, content)
        } else if next.is_empty() {
            (DiffLineType::Context, "")
        } else {
            // "\ No newline at end of file"
            continue;
        };

        hunk_lines.push(DiffLine {
            line_type,
            content: content.to_string(),
        });
    }

    Some(Hunk { lines: hunk_lines })
}

/// Whether `line` is a well-formed `@@ -old,count +new,count @@` header.
fn is_hunk_header(line: &str) -> bool {
    let parse = || -> Option<()> {
        let line = line.strip_prefix("@@ ")?;
        let end = line.find(" @@")?;
        let (old, new) = line[..end].split_once(' ')?;
        range_start(old.strip_prefix('-')?)?;
        range_start(new.strip_prefix('+')?)?;
        Some(())
    };
    parse().is_some()
}

fn range_start(s: &str) -> Option<u32> {
    s.split(',').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_DIFF: &str = r#"diff --git a/modules/user/handler.go b/modules/user/handler.go
index 1234567..abcdefg 100644
--- a/modules/user/handler.go
+++ b/modules/user/handler.go
@@ -1,5 +1,6 @@
 package user
-func old() {}
+func New() {}
+func Other() {}

 // end
"#;

    #[test]
    fn parse_simple_diff() {
        let files = parse_unified_diff(SAMPLE_DIFF);
        assert_eq!(files.len(), 1);

        let file = &files[0];
        assert_eq!(file.old_path, "modules/user/handler.go");
        assert_eq!(file.new_path, "modules/user/handler.go");
        assert!(!file.is_new);
        assert!(!file.is_deleted);
        assert_eq!(file.hunks.len(), 1);
        assert_eq!(file.hunks[0].lines.len(), 6);
        assert_eq!(
            file.added_lines().collect::<Vec<_>>(),
            vec!["func New() {}", "func Other() {}"]
        );
    }

    #[test]
    fn raw_section_is_kept_verbatim() {
        let files = parse_unified_diff(SAMPLE_DIFF);
        assert_eq!(files[0].raw, SAMPLE_DIFF);
    }

    #[test]
    fn parse_new_file() {
        let diff = "diff --git a/modules/user/routes.go b/modules/user/routes.go\n\
new file mode 100644\n\
index 0000000..1234567\n\
--- /dev/null\n\
+++ b/modules/user/routes.go\n\
@@ -0,0 +1,2 @@\n\
+package user\n\
+// routes\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert!(files[0].is_new);
        assert_eq!(files[0].new_path, "modules/user/routes.go");
        assert_eq!(files[0].old_path, "modules/user/routes.go");
        assert_eq!(files[0].added_lines().count(), 2);
    }

    #[test]
    fn parse_deleted_file() {
        let diff = "diff --git a/old.go b/old.go\n\
deleted file mode 100644\n\
index 1234567..0000000\n\
--- a/old.go\n\
+++ /dev/null\n\
@@ -1,1 +0,0 @@\n\
-package old\n";
        let files = parse_unified_diff(diff);
        assert!(files[0].is_deleted);
        assert_eq!(files[0].path(), "old.go");
        assert_eq!(files[0].added_lines().count(), 0);
    }

    #[test]
    fn sections_are_split_in_order() {
        let diff = "diff --git a/a.go b/a.go\n--- a/a.go\n+++ b/a.go\n@@ -1 +1 @@\n-1\n+2\n\
diff --git a/b.go b/b.go\n--- a/b.go\n+++ b/b.go\n@@ -1 +1 @@\n-3\n+4\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path(), "a.go");
        assert_eq!(files[1].path(), "b.go");
        assert!(files[0].raw.ends_with("+2\n"));
        assert!(files[1].raw.starts_with("diff --git a/b.go"));
    }

    #[test]
    fn parse_rename_uses_rename_lines() {
        let diff = "diff --git a/old name.go b/new name.go\n\
similarity index 95%\n\
rename from old name.go\n\
rename to new name.go\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].old_path, "old name.go");
        assert_eq!(files[0].new_path, "new name.go");
    }

    #[test]
    fn hunk_header_shapes() {
        assert!(is_hunk_header("@@ -1,3 +1,4 @@ func main() {"));
        assert!(is_hunk_header("@@ -0,0 +1 @@"));
        assert!(!is_hunk_header("@@ garbage @@"));
        assert!(!is_hunk_header("@@ -x +1 @@"));
    }

    #[test]
    fn parse_binary_file() {
        let diff = "diff --git a/logo.png b/logo.png\n\
new file mode 100644\n\
index 0000000..1234567\n\
Binary files /dev/null and b/logo.png differ\n";
        let files = parse_unified_diff(diff);
        assert!(files[0].is_new);
        assert_eq!(files[0].path(), "logo.png");
        assert!(files[0].hunks.is_empty());
    }

    #[test]
    fn no_newline_marker_is_skipped() {
        let diff = "diff --git a/t.go b/t.go\n--- a/t.go\n+++ b/t.go\n@@ -1 +1 @@\n-old\n+new\n\\ No newline at end of file\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].hunks[0].lines.len(), 2);
    }

    #[test]
    fn text_before_first_header_is_ignored() {
        let files = parse_unified_diff("warning: something\n");
        assert!(files.is_empty());
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn strip_diff_prefix_variants() {
        assert_eq!(strip_diff_prefix("a/file.go"), "file.go");
        assert_eq!(strip_diff_prefix("w/file.go"), "file.go");
        assert_eq!(strip_diff_prefix("x/file.go"), "x/file.go");
        assert_eq!(strip_diff_prefix("src/file.go"), "src/file.go");
        assert_eq!(strip_diff_prefix(""), "");
    }
}
