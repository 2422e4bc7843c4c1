//! GitHub command - search issues, read comments.

use anyhow::Result;
use clap::{Args, Subcommand};
use gleaner_config::Config;
use gleaner_core::ServiceKind;
use gleaner_providers::github::split_repo;

use super::{adapters, emit};
use crate::Cli;

/// Arguments for the github command.
#[derive(Args)]
pub struct GitHubArgs {
    #[command(subcommand)]
    pub action: GitHubAction,
}

/// GitHub subcommands.
#[derive(Subcommand)]
pub enum GitHubAction {
    /// Search issues and pull requests.
    Issues {
        /// GitHub search query.
        query: String,
        /// Limit to one repository (`owner/name`).
        #[arg(long, short)]
        repo: Option<String>,
    },

    /// List comments on an issue or pull request.
    Comments {
        /// Repository (`owner/name`).
        repo: String,
        /// Issue or pull request number.
        number: u64,
    },
}

/// Runs the github command.
pub async fn run(args: &GitHubArgs, cli: &Cli, config: &Config) -> Result<()> {
    let token = config.optional_token(ServiceKind::GitHub);
    let github = adapters(config)?.github;

    match &args.action {
        GitHubAction::Issues { query, repo } => {
            let issues = github
                .search_issues(token.as_deref(), query, repo.as_deref())
                .await?;
            emit(cli, &issues, |f| f.format_issues(&issues))
        }
        GitHubAction::Comments { repo, number } => {
            let (owner, name) = split_repo(repo)?;
            let comments = github
                .list_issue_comments(token.as_deref(), owner, name, *number)
                .await?;
            emit(cli, &comments, |f| f.format_comments(&comments))
        }
    }
}
