//! Qiita command - search items, list a user's items.

use anyhow::Result;
use clap::{Args, Subcommand};
use gleaner_config::Config;
use gleaner_core::ServiceKind;

use super::{adapters, emit};
use crate::Cli;

/// Arguments for the qiita command.
#[derive(Args)]
pub struct QiitaArgs {
    #[command(subcommand)]
    pub action: QiitaAction,
}

/// Qiita subcommands.
#[derive(Subcommand)]
pub enum QiitaAction {
    /// Search items (`tag:rust`, `user:alice`, free text).
    Search {
        /// Qiita search query.
        query: String,
    },

    /// List one user's items.
    User {
        /// Qiita user ID.
        user_id: String,
    },
}

/// Runs the qiita command.
pub async fn run(args: &QiitaArgs, cli: &Cli, config: &Config) -> Result<()> {
    let token = config.optional_token(ServiceKind::Qiita);
    let qiita = adapters(config)?.qiita;

    let items = match &args.action {
        QiitaAction::Search { query } => qiita.search_items(token.as_deref(), query).await?,
        QiitaAction::User { user_id } => qiita.list_user_items(token.as_deref(), user_id).await?,
    };

    emit(cli, &items, |f| f.format_qiita_items(&items))
}
