//! GitHub issue and comment types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// An issue or pull request returned by the search API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Global ID.
    pub id: u64,
    /// Repository-local number.
    pub number: u64,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Markdown body (null when empty upstream).
    #[serde(default)]
    pub body: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
    /// API URL of the owning repository.
    #[serde(default)]
    pub repository_url: Option<String>,
    /// "open" or "closed".
    #[serde(default)]
    pub state: String,
    /// Author.
    #[serde(default)]
    pub user: Option<GitHubUser>,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<GitHubLabel>,
    /// Number of comments.
    #[serde(default)]
    pub comments: u64,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Present only for pull requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

impl GitHubIssue {
    /// Returns true if this entry is a pull request.
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Returns `owner/name` parsed from the repository URL.
    pub fn repository(&self) -> Option<String> {
        let url = self.repository_url.as_deref()?;
        let mut parts = url.rsplit('/');
        let name = parts.next()?;
        let owner = parts.next()?;
        Some(format!("{owner}/{name}"))
    }
}

/// A GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUser {
    /// Login name.
    pub login: String,
    /// Account ID.
    #[serde(default)]
    pub id: u64,
}

/// An issue label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubLabel {
    /// Label name.
    pub name: String,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitHubComment {
    /// Comment ID.
    pub id: u64,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
    /// Author.
    #[serde(default)]
    pub user: Option<GitHubUser>,
    /// Web URL.
    #[serde(default)]
    pub html_url: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
}
