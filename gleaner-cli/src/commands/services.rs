//! Services command - list supported services.

use anyhow::Result;
use gleaner_config::Config;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the services command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    info!("Listing services");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_services(config));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_services(config)?);
        }
    }

    Ok(())
}
