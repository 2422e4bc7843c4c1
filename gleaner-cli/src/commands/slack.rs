//! Slack command - search messages, read threads, collect threads.

use anyhow::Result;
use clap::{Args, Subcommand};
use gleaner_config::Config;
use gleaner_core::{ServiceKind, SlackChannel, SlackThread};
use gleaner_providers::CollectOptions;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::{adapters, emit};
use crate::{Cli, OutputFormat};

/// Arguments for the slack command.
#[derive(Args)]
pub struct SlackArgs {
    #[command(subcommand)]
    pub action: SlackAction,
}

/// Slack subcommands.
#[derive(Subcommand)]
pub enum SlackAction {
    /// Run one page of `search.messages`.
    Search {
        /// Slack search query.
        query: String,
        /// Matches per page.
        #[arg(long, default_value_t = 20)]
        count: u32,
        /// 1-indexed page.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Print one thread with its replies.
    Thread {
        /// Channel ID.
        channel: String,
        /// Parent message timestamp.
        thread_ts: String,
    },

    /// Search, then expand every matching thread and its authors.
    Collect {
        /// Slack search query.
        query: String,
        /// Ceiling on search matches (defaults to `slack.max_messages`).
        #[arg(long)]
        max_messages: Option<usize>,
        /// Search page size (defaults to `slack.page_size`).
        #[arg(long)]
        page_size: Option<u32>,
    },
}

/// Runs the slack command.
pub async fn run(args: &SlackArgs, cli: &Cli, config: &Config) -> Result<()> {
    let token = config.token_for(ServiceKind::Slack)?;
    let adapters = adapters(config)?;

    match &args.action {
        SlackAction::Search { query, count, page } => {
            let result = adapters.slack.search_messages(&token, query, *count, *page).await?;
            emit(cli, &result, |f| f.format_search_page(&result))
        }
        SlackAction::Thread { channel, thread_ts } => {
            let messages = adapters
                .slack
                .get_thread_messages(&token, channel, thread_ts)
                .await?;
            let thread = SlackThread {
                channel: SlackChannel {
                    id: channel.clone(),
                    name: None,
                },
                thread_ts: thread_ts.clone(),
                permalink: None,
                messages,
            };
            emit(cli, &thread, |f| f.format_thread(&thread, &BTreeMap::new()))
        }
        SlackAction::Collect {
            query,
            max_messages,
            page_size,
        } => {
            let defaults = config.slack.collect_options();
            let options = CollectOptions {
                max_messages: max_messages.unwrap_or(defaults.max_messages),
                page_size: page_size.unwrap_or(defaults.page_size),
            };

            let collection = adapters.slack_collector().collect(&token, query, options).await?;
            info!(
                threads = collection.threads.len(),
                failures = collection.failures.len(),
                "Slack collection finished"
            );

            // Text output already lists failures inline.
            if cli.format == OutputFormat::Json && !cli.quiet {
                for failure in &collection.failures {
                    warn!(stage = %failure.stage, target = %failure.target, error = %failure.error, "Partial failure");
                }
            }
            emit(cli, &collection, |f| f.format_collection(&collection))
        }
    }
}
