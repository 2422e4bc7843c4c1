//! Docbase command - search posts.

use anyhow::Result;
use clap::{Args, Subcommand};
use gleaner_config::Config;
use gleaner_core::{ApiError, ServiceKind};
use gleaner_providers::{AdvancedFilters, DocbaseSearch};
use tracing::info;

use super::{adapters, emit};
use crate::Cli;

/// Arguments for the docbase command.
#[derive(Args)]
pub struct DocbaseArgs {
    #[command(subcommand)]
    pub action: DocbaseAction,
}

/// Docbase subcommands.
#[derive(Subcommand)]
pub enum DocbaseAction {
    /// Search posts by exact phrase and filters.
    Search(SearchArgs),
}

/// Arguments for `docbase search`.
#[derive(Args)]
pub struct SearchArgs {
    /// Exact phrase to search for (may be empty when filters are given).
    #[arg(default_value = "")]
    pub keyword: String,

    /// Team domain (overrides `docbase.domain` in the config).
    #[arg(long, short)]
    pub domain: Option<String>,

    /// Comma-separated tags.
    #[arg(long, default_value = "")]
    pub tags: String,

    /// Author name.
    #[arg(long, default_value = "")]
    pub author: String,

    /// Title substring.
    #[arg(long, default_value = "")]
    pub title: String,

    /// Created on or after (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    pub from: String,

    /// Created on or before (YYYY-MM-DD).
    #[arg(long, default_value = "")]
    pub to: String,

    /// Group name.
    #[arg(long, default_value = "")]
    pub group: String,
}

impl SearchArgs {
    fn filters(&self) -> AdvancedFilters {
        AdvancedFilters {
            tags: self.tags.clone(),
            author: self.author.clone(),
            title: self.title.clone(),
            start_date: self.from.clone(),
            end_date: self.to.clone(),
            group: self.group.clone(),
        }
    }
}

/// Runs the docbase command.
pub async fn run(args: &DocbaseArgs, cli: &Cli, config: &Config) -> Result<()> {
    match &args.action {
        DocbaseAction::Search(search) => run_search(search, cli, config).await,
    }
}

async fn run_search(args: &SearchArgs, cli: &Cli, config: &Config) -> Result<()> {
    let domain = args
        .domain
        .clone()
        .or_else(|| config.docbase.domain.clone())
        .ok_or_else(|| {
            ApiError::validation("No Docbase domain: pass --domain or set docbase.domain in the config")
        })?;

    let search = DocbaseSearch {
        domain,
        token: config.token_for(ServiceKind::Docbase)?,
        keyword: args.keyword.clone(),
        filters: args.filters(),
    };

    let posts = adapters(config)?.docbase.search_posts(&search).await?;
    info!(count = posts.len(), "Docbase search finished");

    emit(cli, &posts, |f| f.format_posts(&posts))
}
