//! HTTP endpoint evidence extracted from added diff lines.
//!
//! Only files under the configured modules directory with the configured
//! source extension are inspected. Three collections are gathered:
//!
//! - route registrations (`router.Post(`, `app.Get(`, ...) on added lines
//! - handler signatures taking the framework's request context
//! - newly added routes files, with a context window around each route call
//!
//! The result grounds the AI's endpoint reporting in literal diff text.

pub mod rules;

use crate::diff::parser::parse_unified_diff;
use crate::models::{EndpointEvidence, FileDiff};

pub use rules::EndpointRules;

/// Heading for route registrations found on added lines.
pub const ROUTES_HEADING: &str = "New/Modified Route Definitions";

/// Heading for handler signatures found on added lines.
pub const HANDLERS_HEADING: &str = "Handler Functions";

/// Heading for newly added routes files.
pub const ROUTE_FILES_HEADING: &str = "New Route Files";

/// A newly added routes file and the context windows cut from its diff.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteFile {
    path: String,
    windows: Vec<Vec<String>>,
}

/// Extract endpoint evidence from a unified diff.
///
/// Returns [`EndpointEvidence::NoneDetected`] when there are no added route
/// registrations and no added routes files, even if handler signatures
/// were found.
pub fn extract_endpoints(raw_diff: &str, rules: &EndpointRules) -> EndpointEvidence {
    let files: Vec<FileDiff> = parse_unified_diff(raw_diff)
        .into_iter()
        .filter(|f| !f.is_deleted && rules.is_module_source(f.path()))
        .collect();

    let mut routes: Vec<String> = Vec::new();
    let mut handlers: Vec<String> = Vec::new();
    for file in &files {
        for line in file.added_lines() {
            if rules.is_route_call(line) {
                routes.push(line.trim().to_string());
            }
            if rules.is_handler_signature(line) {
                handlers.push(line.trim().to_string());
            }
        }
    }

    let route_files: Vec<RouteFile> = files
        .iter()
        .filter(|f| f.is_new && rules.is_routes_file(f.path()))
        .map(|f| RouteFile {
            path: f.path().to_string(),
            windows: route_windows(&f.raw, rules),
        })
        .collect();

    tracing::debug!(
        routes = routes.len(),
        handlers = handlers.len(),
        route_files = route_files.len(),
        "endpoint extraction finished"
    );

    if routes.is_empty() && route_files.is_empty() {
        return EndpointEvidence::NoneDetected;
    }

    EndpointEvidence::Found(render_report(&routes, &handlers, &route_files))
}

/// Context windows around route calls on added lines of one file's diff.
///
/// Overlapping windows are merged, like `grep -B -A` does.
fn route_windows(section: &str, rules: &EndpointRules) -> Vec<Vec<String>> {
    let body: Vec<&str> = section
        .lines()
        .skip_while(|l| !l.starts_with("@@"))
        .collect();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for (i, line) in body.iter().enumerate() {
        let Some(added) = line.strip_prefix('+') else {
            continue;
        };
        if !rules.is_route_call(added) {
            continue;
        }
        let start = i.saturating_sub(rules.context_before);
        let end = (i + rules.context_after).min(body.len().saturating_sub(1));
        match ranges.last_mut() {
            Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
            _ => ranges.push((start, end)),
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| body[start..=end].iter().map(|l| l.to_string()).collect())
        .collect()
}

fn render_report(routes: &[String], handlers: &[String], route_files: &[RouteFile]) -> String {
    let mut sections: Vec<String> = Vec::new();

    if !routes.is_empty() {
        sections.push(format!("## {ROUTES_HEADING}\n{}", routes.join("\n")));
    }

    if !handlers.is_empty() {
        sections.push(format!("## {HANDLERS_HEADING}\n{}", handlers.join("\n")));
    }

    if !route_files.is_empty() {
        let mut block = format!("## {ROUTE_FILES_HEADING}");
        for file in route_files {
            block.push_str(&format!("\n### {}", file.path));
            let windows: Vec<String> = file.windows.iter().map(|w| w.join("\n")).collect();
            if !windows.is_empty() {
                block.push('\n');
                block.push_str(&windows.join("\n--\n"));
            }
        }
        sections.push(block);
    }

    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NO_API_CHANGES;
    use pretty_assertions::assert_eq;

    fn modified(path: &str, added: &[&str]) -> String {
        let mut s = format!(
            "diff --git a/{path} b/{path}\nindex 111..222 100644\n--- a/{path}\n+++ b/{path}\n@@ -1,2 +1,{} @@\n package x\n",
            added.len() + 2
        );
        for line in added {
            s.push_str(&format!("+{line}\n"));
        }
        s.push_str(" // end\n");
        s
    }

    fn new_file(path: &str, lines: &[&str]) -> String {
        let mut s = format!(
            "diff --git a/{path} b/{path}\nnew file mode 100644\nindex 0000000..1234567\n--- /dev/null\n+++ b/{path}\n@@ -0,0 +1,{} @@\n",
            lines.len()
        );
        for line in lines {
            s.push_str(&format!("+{line}\n"));
        }
        s
    }

    #[test]
    fn no_route_changes_yields_sentinel() {
        let diff = modified("modules/user/service.go", &["x := 1"]);
        let evidence = extract_endpoints(&diff, &EndpointRules::default());
        assert_eq!(evidence, EndpointEvidence::NoneDetected);
        assert_eq!(evidence.as_text(), NO_API_CHANGES);
        assert!(!evidence.as_text().contains("##"));
    }

    #[test]
    fn empty_diff_yields_sentinel() {
        let evidence = extract_endpoints("", &EndpointRules::default());
        assert_eq!(evidence, EndpointEvidence::NoneDetected);
    }

    #[test]
    fn added_route_call_is_reported_alone() {
        let diff = modified(
            "modules/user/handler.go",
            &["\trouter.Post(\"/users\", createUser)"],
        );
        let evidence = extract_endpoints(&diff, &EndpointRules::default());
        let text = evidence.evidence().expect("evidence expected");
        assert_eq!(
            text,
            "## New/Modified Route Definitions\nrouter.Post(\"/users\", createUser)\n"
        );
        assert!(!text.contains(HANDLERS_HEADING));
        assert!(!text.contains(ROUTE_FILES_HEADING));
    }

    #[test]
    fn route_calls_outside_modules_are_ignored() {
        let diff = modified("cmd/server/main.go", &["app.Get(\"/health\", ok)"]);
        assert_eq!(
            extract_endpoints(&diff, &EndpointRules::default()),
            EndpointEvidence::NoneDetected
        );
    }

    #[test]
    fn wrong_extension_is_ignored() {
        let diff = modified("modules/web/app.ts", &["router.Get(\"/x\", y)"]);
        assert_eq!(
            extract_endpoints(&diff, &EndpointRules::default()),
            EndpointEvidence::NoneDetected
        );
    }

    #[test]
    fn removed_route_lines_are_not_evidence() {
        let diff = "diff --git a/modules/a/h.go b/modules/a/h.go\n--- a/modules/a/h.go\n+++ b/modules/a/h.go\n@@ -1,2 +1,1 @@\n package a\n-router.Delete(\"/x\", del)\n";
        assert_eq!(
            extract_endpoints(diff, &EndpointRules::default()),
            EndpointEvidence::NoneDetected
        );
    }

    #[test]
    fn handlers_alone_still_yield_sentinel() {
        let diff = modified(
            "modules/user/handler.go",
            &["func CreateUser(c *fiber.Ctx) error {"],
        );
        assert_eq!(
            extract_endpoints(&diff, &EndpointRules::default()),
            EndpointEvidence::NoneDetected
        );
    }

    #[test]
    fn handlers_are_listed_with_routes() {
        let diff = modified(
            "modules/user/handler.go",
            &[
                "func (h *Handler) CreateUser(c *fiber.Ctx) error {",
                "api.Put(\"/users/:id\", h.UpdateUser)",
            ],
        );
        let text = extract_endpoints(&diff, &EndpointRules::default())
            .evidence()
            .unwrap()
            .to_string();
        let routes_at = text.find(ROUTES_HEADING).unwrap();
        let handlers_at = text.find(HANDLERS_HEADING).unwrap();
        assert!(routes_at < handlers_at);
        assert!(text.contains("func (h *Handler) CreateUser(c *fiber.Ctx) error {"));
    }

    #[test]
    fn new_routes_file_gets_context_windows() {
        let mut lines: Vec<String> = vec!["package user".into(), "".into(), "func Register(r fiber.Router) {".into()];
        lines.push("\tr.Get(\"/users\", list)".into());
        for i in 0..15 {
            lines.push(format!("\t// filler {i}"));
        }
        lines.push("}".into());
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let diff = new_file("modules/user/routes.go", &refs);

        let text = extract_endpoints(&diff, &EndpointRules::default())
            .evidence()
            .unwrap()
            .to_string();
        assert!(text.contains("## New Route Files\n### modules/user/routes.go\n"));

        let block = text.split("### modules/user/routes.go\n").nth(1).unwrap();
        let window: Vec<&str> = block.lines().collect();
        // 2 lines before, the match, 10 after.
        assert_eq!(window.len(), 13);
        assert_eq!(window[0], "+");
        assert_eq!(window[2], "+\tr.Get(\"/users\", list)");
        assert_eq!(window[12], "+\t// filler 9");
    }

    #[test]
    fn overlapping_windows_are_merged() {
        let section = "@@ -0,0 +1,4 @@\n+a.Get(\"/1\", h)\n+a.Get(\"/2\", h)\n+x\n+y\n";
        let windows = route_windows(section, &EndpointRules::default());
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].len(), 5);
        assert_eq!(windows[0][0], "@@ -0,0 +1,4 @@");
    }

    #[test]
    fn modified_routes_file_is_not_a_new_route_file() {
        let diff = modified("modules/user/routes.go", &["r.Patch(\"/users/:id\", patch)"]);
        let text = extract_endpoints(&diff, &EndpointRules::default())
            .evidence()
            .unwrap()
            .to_string();
        assert!(text.contains(ROUTES_HEADING));
        assert!(!text.contains(ROUTE_FILES_HEADING));
    }
}
