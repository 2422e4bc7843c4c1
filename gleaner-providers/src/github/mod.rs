//! GitHub adapter (issues, pull requests and their comments).

mod api;

pub use api::{split_repo, GitHubClient, GITHUB_API_BASE};
