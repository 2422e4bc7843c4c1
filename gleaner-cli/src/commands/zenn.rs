//! Zenn command - list and read articles.

use anyhow::Result;
use clap::{Args, Subcommand};
use gleaner_config::Config;

use super::{adapters, emit};
use crate::Cli;

/// Arguments for the zenn command.
#[derive(Args)]
pub struct ZennArgs {
    #[command(subcommand)]
    pub action: ZennAction,
}

/// Zenn subcommands.
#[derive(Subcommand)]
pub enum ZennAction {
    /// List a user's articles, newest first.
    Articles {
        /// Zenn username.
        username: String,
    },

    /// Fetch one article with its rendered body.
    Article {
        /// Article slug.
        slug: String,
    },
}

/// Runs the zenn command.
pub async fn run(args: &ZennArgs, cli: &Cli, config: &Config) -> Result<()> {
    let zenn = adapters(config)?.zenn;

    match &args.action {
        ZennAction::Articles { username } => {
            let articles = zenn.list_user_articles(username).await?;
            emit(cli, &articles, |f| f.format_zenn_articles(&articles))
        }
        ZennAction::Article { slug } => {
            let article = zenn.get_article(slug).await?;
            emit(cli, &article, |f| f.format_zenn_article(&article))
        }
    }
}
