//! Config command - manage configuration.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use gleaner_config::Config;
use gleaner_core::ServiceKind;
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show the configuration file path.
    Path,

    /// Write a default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, cli: &Cli, config: &Config) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, config),
        ConfigAction::Path => show_path(cli),
        ConfigAction::Init { force } => init_config(cli, *force),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Config::default_path)
}

fn show_config(cli: &Cli, config: &Config) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("Gleaner Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Timeout: {}s", config.general.timeout_secs);
            println!("Log level: {}", config.general.log_level);
            println!(
                "Retries: {} (initial backoff {}ms)",
                config.retry.max_retries, config.retry.initial_backoff_ms
            );
            println!(
                "Docbase domain: {}",
                config.docbase.domain.as_deref().unwrap_or("-")
            );
            println!(
                "Slack collect: {} messages, {} per page",
                config.slack.max_messages, config.slack.page_size
            );
            println!();
            println!("Token variables:");
            for kind in ServiceKind::all() {
                if let Some(env) = config.token_env(*kind) {
                    println!("  • {}: {env}", kind.display_name());
                }
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(config)?);
        }
    }

    Ok(())
}

fn show_path(cli: &Cli) -> Result<()> {
    let path = config_path(cli);

    match cli.format {
        OutputFormat::Text => println!("{}", path.display()),
        OutputFormat::Json => {
            let paths = serde_json::json!({ "config_file": path.display().to_string() });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = config_path(cli);

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    info!(path = %path.display(), "Configuration initialized");
    println!("Wrote {}", path.display());

    Ok(())
}
