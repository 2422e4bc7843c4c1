//! GitHub REST API client.

use std::sync::Arc;

use gleaner_core::{ApiError, GitHubComment, GitHubIssue};
use gleaner_fetch::{RequestClient, RequestClientExt, RequestOptions};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::endpoint::{build_url, optional_bearer, require, require_segment};
use crate::pagination::{collect_pages, PageLimits};

// ============================================================================
// Constants
// ============================================================================

/// GitHub API base URL.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// GitHub API version header.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Media type for REST v3 JSON.
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

const PER_PAGE: usize = 100;

/// Search pages fetched at most (500 issues).
const MAX_SEARCH_PAGES: u32 = 5;

/// Comment pages fetched at most (1000 comments).
const MAX_COMMENT_PAGES: u32 = 10;

// ============================================================================
// API Types
// ============================================================================

/// Response from `/search/issues`.
#[derive(Debug, Deserialize)]
struct SearchIssuesResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default)]
    items: Vec<GitHubIssue>,
}

// ============================================================================
// API Client
// ============================================================================

/// GitHub adapter.
///
/// Works anonymously; a token raises the rate limit and reaches private
/// repositories.
#[derive(Clone)]
pub struct GitHubClient {
    client: Arc<dyn RequestClient>,
    base_url: String,
}

impl GitHubClient {
    /// Creates an adapter over the given request client.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            base_url: GITHUB_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (GitHub Enterprise: `https://host/api/v3`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn options(token: Option<&str>) -> RequestOptions {
        let options = RequestOptions::get()
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION);
        optional_bearer(options, token)
    }

    pub(crate) fn search_url(&self, query: &str, page: u32) -> Result<String, ApiError> {
        let (per_page, page) = (PER_PAGE.to_string(), page.to_string());
        build_url(
            &self.base_url,
            "/search/issues",
            &[("q", query), ("per_page", &per_page), ("page", &page)],
        )
    }

    pub(crate) fn comments_url(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: u32,
    ) -> Result<String, ApiError> {
        let (per_page, page) = (PER_PAGE.to_string(), page.to_string());
        build_url(
            &self.base_url,
            &format!("/repos/{owner}/{repo}/issues/{number}/comments"),
            &[("per_page", &per_page), ("page", &page)],
        )
    }

    /// Searches issues and pull requests.
    ///
    /// `repo` (`owner/name`) narrows the search to one repository.
    #[instrument(skip(self, token))]
    pub async fn search_issues(
        &self,
        token: Option<&str>,
        query: &str,
        repo: Option<&str>,
    ) -> Result<Vec<GitHubIssue>, ApiError> {
        let query = require("query", query)?;
        let query = match repo.map(str::trim).filter(|r| !r.is_empty()) {
            Some(repo) => {
                let (owner, name) = split_repo(repo)?;
                format!("{query} repo:{owner}/{name}")
            }
            None => query.to_string(),
        };

        let options = Self::options(token);
        let issues = collect_pages(PageLimits::new(PER_PAGE, MAX_SEARCH_PAGES), |page| {
            let (options, query) = (&options, &query);
            async move {
                let url = self.search_url(query, page)?;
                let response: SearchIssuesResponse = self.client.request(&url, options).await?;
                debug!(
                    page,
                    total = response.total_count,
                    incomplete = response.incomplete_results,
                    "GitHub search page"
                );
                Ok(response.items)
            }
        })
        .await?;

        info!(count = issues.len(), "GitHub search complete");
        Ok(issues)
    }

    /// Lists the comments on one issue or pull request, oldest first.
    #[instrument(skip(self, token))]
    pub async fn list_issue_comments(
        &self,
        token: Option<&str>,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<GitHubComment>, ApiError> {
        let owner = require_segment("owner", owner)?;
        let repo = require_segment("repo", repo)?;
        if number == 0 {
            return Err(ApiError::validation("issue number must be positive"));
        }

        let options = Self::options(token);
        collect_pages(PageLimits::new(PER_PAGE, MAX_COMMENT_PAGES), |page| {
            let options = &options;
            async move {
                let url = self.comments_url(owner, repo, number, page)?;
                self.client.request::<Vec<GitHubComment>>(&url, options).await
            }
        })
        .await
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Splits `owner/name`, validating both halves.
pub fn split_repo(repo: &str) -> Result<(&str, &str), ApiError> {
    let (owner, name) = repo
        .trim()
        .split_once('/')
        .ok_or_else(|| ApiError::validation(format!("repository must be owner/name, got {repo}")))?;
    Ok((require_segment("owner", owner)?, require_segment("repo", name)?))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_core::ApiErrorKind;
    use gleaner_fetch::{MockRequestClient, MockResponse};
    use serde_json::{json, Value};

    fn urls() -> GitHubClient {
        GitHubClient::new(Arc::new(MockRequestClient::new()))
    }

    fn adapter(responses: Vec<MockResponse>) -> (Arc<MockRequestClient>, GitHubClient) {
        let mock = Arc::new(MockRequestClient::with_responses(responses));
        (mock.clone(), GitHubClient::new(mock))
    }

    fn issues(start: u64, count: u64) -> Value {
        let items: Vec<Value> = (start..start + count)
            .map(|n| json!({"id": n, "number": n, "title": format!("Issue {n}")}))
            .collect();
        json!({"total_count": 1000, "incomplete_results": false, "items": items})
    }

    #[test]
    fn test_split_repo() {
        assert_eq!(split_repo("octo/app").unwrap(), ("octo", "app"));
        assert!(split_repo("octo").is_err());
        assert!(split_repo("octo/../x").is_err());
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            urls().search_url("crash repo:octo/app", 1).unwrap(),
            "https://api.github.com/search/issues?q=crash+repo%3Aocto%2Fapp&per_page=100&page=1"
        );
    }

    #[tokio::test]
    async fn test_search_scoped_to_repo() {
        let url = urls().search_url("crash repo:octo/app", 1).unwrap();
        let (mock, client) = adapter(vec![MockResponse::ok(url, issues(1, 2))]);

        let result = client.search_issues(None, "crash", Some("octo/app")).await.unwrap();

        assert_eq!(result.len(), 2);
        let call = &mock.calls()[0];
        assert_eq!(call.header("Accept"), Some(GITHUB_ACCEPT));
        assert_eq!(call.header("X-GitHub-Api-Version"), Some(GITHUB_API_VERSION));
        assert_eq!(call.header("Authorization"), None);
    }

    #[tokio::test]
    async fn test_search_paginates() {
        let (mock, client) = adapter(vec![
            MockResponse::ok(urls().search_url("leak", 1).unwrap(), issues(1, 100)),
            MockResponse::ok(urls().search_url("leak", 2).unwrap(), issues(101, 7)),
        ]);

        let result = client.search_issues(Some("ghp_1"), "leak", None).await.unwrap();

        assert_eq!(result.len(), 107);
        assert_eq!(result[100].number, 101);
        assert_eq!(mock.calls()[1].header("Authorization"), Some("Bearer ghp_1"));
    }

    #[tokio::test]
    async fn test_empty_query_is_validation() {
        let (mock, client) = adapter(vec![]);

        let err = client.search_issues(None, "", None).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Validation);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_comments() {
        let url = urls().comments_url("octo", "app", 42, 1).unwrap();
        assert_eq!(
            url,
            "https://api.github.com/repos/octo/app/issues/42/comments?per_page=100&page=1"
        );
        let (_, client) = adapter(vec![MockResponse::ok(
            url,
            json!([{"id": 1, "body": "same here", "user": {"login": "octocat"}}]),
        )]);

        let comments = client.list_issue_comments(None, "octo", "app", 42).await.unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "same here");
    }

    #[tokio::test]
    async fn test_comments_not_found() {
        let url = urls().comments_url("octo", "gone", 1, 1).unwrap();
        let (_, client) = adapter(vec![MockResponse::status(url, 404)]);

        let err = client.list_issue_comments(None, "octo", "gone", 1).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
    }
}
