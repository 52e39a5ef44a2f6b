//! gemini-review — AI code review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use gemini_review::config;
use gemini_review::diff;
use gemini_review::doctor;
use gemini_review::env;
use gemini_review::output;
use gemini_review::pipeline;
use gemini_review::progress;
use gemini_review::providers;
use gemini_review::setup;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::args::{Cli, Mode};
use config::Config;
use env::Env;
use output::OutputRenderer;
use pipeline::{PipelineError, ReviewOptions, ReviewOutcome};
use progress::ProgressReporter;
use providers::gemini::GeminiCli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            cli::print_error(&format!("failed to start runtime: {e}"), &[]);
            process::exit(1);
        }
    };

    let code = match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<PipelineError>() {
                Some(pe) => cli::print_error(&format!("{}: {pe}", pe.kind()), &pe.hints()),
                None => cli::print_error(&format!("{err:#}"), &[]),
            }
            1
        }
    };
    process::exit(code);
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "gemini_review=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<i32> {
    let env = Env::real();
    let base_dir = std::fs::canonicalize(&cli.path)
        .with_context(|| format!("--path directory not found: {}", cli.path.display()))?;
    let repo_root = match diff::git::find_repo_root(&base_dir).await {
        Ok(root) => PathBuf::from(root),
        Err(_) => base_dir.clone(),
    };

    let mode = cli.mode();
    // A broken config file is one of the things --repair reports on.
    let (config, config_error) = if mode == Mode::Repair {
        Config::load_or_default(Some(&repo_root), &env)
    } else {
        let config =
            Config::load(Some(&repo_root), &env).context("failed to load configuration")?;
        (config, None)
    };

    match mode {
        Mode::Setup => run_setup(&config).await,
        Mode::Repair => run_repair(&config, config_error.as_ref(), &env).await,
        Mode::Review(target) => run_review(&cli, target, base_dir, &config, &env).await,
    }
}

async fn run_review(
    cli: &Cli,
    target: String,
    base_dir: PathBuf,
    config: &Config,
    env: &Env,
) -> Result<i32> {
    let runner = GeminiCli::from_config(&config.ai, config.project_id());
    let progress = ProgressReporter::new(true);
    let work_dir = std::env::current_dir().context("failed to read the working directory")?;

    let options = ReviewOptions {
        repo_dir: base_dir,
        target,
        save: cli.save_mode(),
        convention: cli.convention.clone(),
        language: cli.language,
        work_dir,
    };

    let outcome = pipeline::run_review(&options, config, env, &runner, &progress).await?;

    match outcome {
        ReviewOutcome::NoChanges {
            current_branch,
            target_branch,
        } => {
            println!(
                "  {} No differences found between {} and {}.",
                "ℹ".blue().bold(),
                current_branch.bold(),
                target_branch.bold()
            );
        }
        ReviewOutcome::Completed {
            report,
            report_path,
            ..
        } => {
            println!();
            print!("{}", output::terminal::TerminalRenderer.render(&report));
            match report_path {
                Some(path) => println!(
                    "\n  {} Report saved to {}",
                    "✔".green().bold(),
                    display_relative(&path, &options.work_dir).bold()
                ),
                None => println!("\n  {} Report not saved (--no-save).", "ℹ".blue().bold()),
            }
        }
    }
    Ok(0)
}

/// Interactive setup of the project id.
async fn run_setup(config: &Config) -> Result<i32> {
    let path = Config::global_config_path().context("could not determine config directory")?;
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let outcome = setup::run_setup(&mut input, &mut out, config, &path)
        .await
        .context("setup failed")?;

    println!(
        "  {} Project {} saved to {}",
        "✔".green().bold(),
        outcome.project_id.bold(),
        outcome.config_path.display()
    );
    match outcome.auth {
        setup::AuthStatus::Ok => {
            println!("  {} {} is authenticated.", "✔".green().bold(), config.ai.command);
            Ok(0)
        }
        setup::AuthStatus::Skipped => {
            println!("  {} Authentication check skipped.", "ℹ".blue().bold());
            Ok(0)
        }
        setup::AuthStatus::Failed(output) => {
            let hint = output
                .lines()
                .map(str::trim)
                .find(|l| !l.is_empty())
                .map(|l| vec![format!("AI CLI said: {l}")])
                .unwrap_or_default();
            cli::print_error(
                &format!("{} could not authenticate", config.ai.command),
                &hint,
            );
            Ok(1)
        }
    }
}

/// Read-only installation diagnostics.
async fn run_repair(
    config: &Config,
    config_error: Option<&config::ConfigError>,
    env: &Env,
) -> Result<i32> {
    let runner = GeminiCli::from_config(&config.ai, config.project_id());
    let ctx = doctor::DoctorContext {
        env,
        config,
        config_error,
        runner: &runner,
        exe_path: std::env::current_exe().ok(),
        home: dirs::home_dir(),
    };
    let results = doctor::run_diagnostics(&ctx).await;

    println!(
        "{} {}\n",
        "gemini-review".bold(),
        gemini_review::constants::VERSION.green().bold()
    );
    print!("{}", doctor::render(&results));

    if doctor::has_failures(&results) {
        println!("\n  {} Some checks failed.", "✖".red().bold());
        Ok(1)
    } else {
        println!("\n  {} All checks passed.", "✔".green().bold());
        Ok(0)
    }
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}
