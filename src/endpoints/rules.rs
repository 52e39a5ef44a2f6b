//! Line and path rules used by the endpoint extractor.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::EndpointsConfig;

/// `<identifier>.<Verb>(` for the HTTP verbs a router exposes.
static ROUTE_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\.(Get|Post|Put|Delete|Patch)\(").unwrap()
});

/// A named function (or method) whose parameters include `*fiber.Ctx`.
static HANDLER_SIGNATURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*func\s+(\([^)]*\)\s*)?[A-Za-z_][A-Za-z0-9_]*\s*\([^)]*\*fiber\.Ctx\b")
        .unwrap()
});

/// Path and context-window settings for endpoint extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRules {
    /// Directory name that marks API modules (any path component).
    pub modules_dir: String,
    /// Source file extension, without the dot.
    pub extension: String,
    /// Filename suffix identifying route registration files.
    pub routes_file: String,
    /// Lines kept before a route call in a new routes file.
    pub context_before: usize,
    /// Lines kept after a route call in a new routes file.
    pub context_after: usize,
}

impl Default for EndpointRules {
    fn default() -> Self {
        Self::from(&EndpointsConfig::default())
    }
}

impl From<&EndpointsConfig> for EndpointRules {
    fn from(config: &EndpointsConfig) -> Self {
        Self {
            modules_dir: config.modules_dir.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
            routes_file: config.routes_file.clone(),
            context_before: 2,
            context_after: 10,
        }
    }
}

impl EndpointRules {
    /// Whether `path` is a source file inside the modules directory.
    pub fn is_module_source(&self, path: &str) -> bool {
        let p = Path::new(path);
        let in_modules = p
            .parent()
            .is_some_and(|dir| dir.components().any(|c| c.as_os_str() == self.modules_dir.as_str()));
        let has_ext = p
            .extension()
            .is_some_and(|e| e == self.extension.as_str());
        in_modules && has_ext
    }

    /// Whether `path` names a routes file.
    pub fn is_routes_file(&self, path: &str) -> bool {
        path.ends_with(&self.routes_file)
    }

    /// Whether an added line registers a route.
    pub fn is_route_call(&self, line: &str) -> bool {
        ROUTE_CALL_RE.is_match(line)
    }

    /// Whether an added line declares a request handler.
    pub fn is_handler_signature(&self, line: &str) -> bool {
        HANDLER_SIGNATURE_RE.is_match(line)
    }
}
