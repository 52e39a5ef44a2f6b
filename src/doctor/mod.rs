//! `--repair`: read-only installation diagnostics.
//!
//! Each check yields one status line. Warnings do not affect the exit code;
//! any failure does.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::config::{Config, ConfigError};
use crate::constants::{APP_NAME, ENV_PROJECT_ID};
use crate::env::Env;
use crate::preflight::{self, PreconditionError};
use crate::providers::AiRunner;

/// Shell startup files searched for an alias or PATH entry.
pub const SHELL_PROFILES: &[&str] = &[".bashrc", ".zshrc", ".bash_profile", ".profile"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
}

/// Result of one diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

/// Inputs to the diagnostics, gathered by the caller.
pub struct DoctorContext<'a> {
    pub env: &'a Env,
    pub config: &'a Config,
    /// Why the config files could not be loaded, when `config` is the fallback.
    pub config_error: Option<&'a ConfigError>,
    pub runner: &'a dyn AiRunner,
    /// Path of the running executable.
    pub exe_path: Option<PathBuf>,
    /// Home directory holding the shell profiles.
    pub home: Option<PathBuf>,
}

/// Run all checks in display order.
pub async fn run_diagnostics(ctx: &DoctorContext<'_>) -> Vec<CheckResult> {
    let mut results = vec![check_install_path(ctx.exe_path.as_deref())];
    results.push(check_install_dir_on_path(ctx.env, ctx.exe_path.as_deref()));
    results.push(check_tool_on_path(ctx.env));
    results.push(check_shell_profiles(ctx.home.as_deref()));

    let git = dependency_check("git", ctx.env, "git");
    let ai_command = ctx.runner.executable().unwrap_or("");
    let ai = if ai_command.is_empty() {
        CheckResult::new("AI CLI", CheckStatus::Ok, ctx.runner.name())
    } else {
        dependency_check("AI CLI", ctx.env, ai_command)
    };
    let ai_available = ai.status == CheckStatus::Ok;
    results.push(git);
    results.push(ai);

    results.push(match ctx.config_error {
        Some(e) => CheckResult::new("configuration", CheckStatus::Fail, e.to_string()),
        None => CheckResult::new("configuration", CheckStatus::Ok, "loaded"),
    });

    let project = match ctx.config.validate() {
        Ok(id) => CheckResult::new("project id", CheckStatus::Ok, id),
        Err(_) => CheckResult::new(
            "project id",
            CheckStatus::Fail,
            format!("not set; export {ENV_PROJECT_ID} or run --setup"),
        ),
    };
    let project_ok = project.status == CheckStatus::Ok;
    results.push(project);

    results.push(if !ai_available || !project_ok {
        CheckResult::new("authentication", CheckStatus::Warn, "skipped")
    } else {
        match preflight::check_auth(ctx.runner).await {
            Ok(()) => CheckResult::new("authentication", CheckStatus::Ok, "AI CLI responded"),
            Err(PreconditionError::AuthFailed { output }) => {
                let first = output
                    .lines()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .unwrap_or("AI CLI exited with an error");
                CheckResult::new("authentication", CheckStatus::Fail, first)
            }
            Err(e) => CheckResult::new("authentication", CheckStatus::Fail, e.to_string()),
        }
    });

    results
}

fn check_install_path(exe: Option<&Path>) -> CheckResult {
    match exe {
        Some(path) => CheckResult::new("installation", CheckStatus::Ok, path.display().to_string()),
        None => CheckResult::new(
            "installation",
            CheckStatus::Fail,
            "could not determine the executable path",
        ),
    }
}

fn check_install_dir_on_path(env: &Env, exe: Option<&Path>) -> CheckResult {
    let Some(dir) = exe.and_then(Path::parent) else {
        return CheckResult::new("install dir on PATH", CheckStatus::Warn, "unknown");
    };
    if env.path_dirs().iter().any(|p| p == dir) {
        CheckResult::new("install dir on PATH", CheckStatus::Ok, dir.display().to_string())
    } else {
        CheckResult::new(
            "install dir on PATH",
            CheckStatus::Warn,
            format!("{} is not on PATH", dir.display()),
        )
    }
}

fn check_tool_on_path(env: &Env) -> CheckResult {
    match env.find_executable(APP_NAME) {
        Some(path) => CheckResult::new("command", CheckStatus::Ok, path.display().to_string()),
        None => CheckResult::new(
            "command",
            CheckStatus::Fail,
            format!("'{APP_NAME}' does not resolve on PATH"),
        ),
    }
}

fn check_shell_profiles(home: Option<&Path>) -> CheckResult {
    let Some(home) = home else {
        return CheckResult::new("shell profile", CheckStatus::Warn, "home directory unknown");
    };
    let found = SHELL_PROFILES.iter().find(|name| {
        std::fs::read_to_string(home.join(name))
            .map(|content| content.contains(APP_NAME))
            .unwrap_or(false)
    });
    match found {
        Some(name) => CheckResult::new("shell profile", CheckStatus::Ok, format!("~/{name}")),
        None => CheckResult::new(
            "shell profile",
            CheckStatus::Warn,
            format!("no shell profile mentions {APP_NAME}"),
        ),
    }
}

fn dependency_check(name: &'static str, env: &Env, program: &str) -> CheckResult {
    match preflight::check_dependencies(env, [program]) {
        Ok(()) => {
            let location = env
                .find_executable(program)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| program.to_string());
            CheckResult::new(name, CheckStatus::Ok, location)
        }
        Err(_) => CheckResult::new(name, CheckStatus::Fail, format!("'{program}' not found on PATH")),
    }
}

/// Whether any check failed.
pub fn has_failures(results: &[CheckResult]) -> bool {
    results.iter().any(|r| r.status == CheckStatus::Fail)
}

/// One line per check.
pub fn render(results: &[CheckResult]) -> String {
    let width = results.iter().map(|r| r.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for r in results {
        let icon = match r.status {
            CheckStatus::Ok => "✔".green().bold(),
            CheckStatus::Warn => "⚠".yellow().bold(),
            CheckStatus::Fail => "✖".red().bold(),
        };
        out.push_str(&format!(
            "  {icon} {:<width$}  {}\n",
            r.name,
            r.detail.dimmed(),
        ));
    }
    out
}
