// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Gleaner CLI - pull knowledge-base content from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Docbase posts tagged "ops" mentioning "deploy"
//! DOCBASE_TOKEN=... gleaner docbase search deploy --domain acme --tags ops
//!
//! # Slack threads around a query, as JSON
//! SLACK_TOKEN=... gleaner --format json --pretty slack collect "incident"
//!
//! # GitHub issues in one repository
//! gleaner github issues "panic" --repo rust-lang/rust
//!
//! # Zenn articles by user
//! gleaner zenn articles kuro
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gleaner_config::{Config, ConfigError};
use gleaner_core::{ApiError, ApiErrorKind};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{config, docbase, github, qiita, services, slack, zenn};

// ============================================================================
// CLI Definition
// ============================================================================

/// Gleaner CLI - knowledge-base search across services.
#[derive(Parser)]
#[command(name = "gleaner")]
#[command(about = "Search Docbase, Slack, GitHub, Qiita and Zenn from one CLI")]
#[command(long_about = r#"
Gleaner searches team knowledge bases and developer communities.

Supported services:
  • Docbase (docbase)   token: DOCBASE_TOKEN
  • Slack (slack)       token: SLACK_TOKEN
  • GitHub (github)     token: GITHUB_TOKEN (optional)
  • Qiita (qiita)       token: QIITA_TOKEN (optional)
  • Zenn (zenn)         no token

Examples:
  gleaner docbase search deploy --domain acme
  gleaner slack collect "incident" --max-messages 100
  gleaner github issues panic --repo octo/app
  gleaner --format json zenn articles kuro
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (debug logs on stderr).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logs, no error message).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search Docbase posts.
    Docbase(docbase::DocbaseArgs),

    /// Search Slack messages and threads.
    Slack(slack::SlackArgs),

    /// Search GitHub issues and read comments.
    #[command(name = "github", visible_alias = "gh")]
    GitHub(github::GitHubArgs),

    /// Search Qiita items.
    Qiita(qiita::QiitaArgs),

    /// List and read Zenn articles.
    Zenn(zenn::ZennArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),

    /// List supported services and their credentials.
    Services,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Credential missing or rejected.
    Unauthorized = 2,
    /// Invalid input.
    Validation = 3,
    /// Resource not found.
    NotFound = 4,
    /// Upstream rate limit.
    RateLimited = 5,
}

impl ExitCode {
    /// Picks the exit code for a failed command.
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(api) = err.downcast_ref::<ApiError>() {
            return match api.kind() {
                ApiErrorKind::Unauthorized | ApiErrorKind::MissingScope => Self::Unauthorized,
                ApiErrorKind::Validation => Self::Validation,
                ApiErrorKind::NotFound => Self::NotFound,
                ApiErrorKind::RateLimit => Self::RateLimited,
                ApiErrorKind::Network | ApiErrorKind::SlackApi | ApiErrorKind::Unknown => Self::Error,
            };
        }
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::MissingToken { .. }) => Self::Unauthorized,
            Some(ConfigError::Invalid(_)) => Self::Validation,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: &str) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("gleaner=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("gleaner={level}")))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let loaded = load_config(cli.config.as_ref());

    let level = loaded
        .as_ref()
        .map_or("warn", |config| config.general.log_level.as_str());
    setup_logging(cli.verbose, cli.quiet, level);

    let result = match loaded {
        Ok(config) => run(&cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }
}

async fn run(cli: &Cli, config: Config) -> Result<()> {
    match &cli.command {
        Commands::Docbase(args) => docbase::run(args, cli, &config).await,
        Commands::Slack(args) => slack::run(args, cli, &config).await,
        Commands::GitHub(args) => github::run(args, cli, &config).await,
        Commands::Qiita(args) => qiita::run(args, cli, &config).await,
        Commands::Zenn(args) => zenn::run(args, cli, &config).await,
        Commands::Config(args) => config::run(args, cli, &config),
        Commands::Services => services::run(cli, &config),
    }
}

// ============================================================================
// Tests
// ============================================================================
