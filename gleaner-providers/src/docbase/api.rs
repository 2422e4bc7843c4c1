//! Docbase API client.

use std::sync::Arc;

use gleaner_core::{ApiError, DocbasePost};
use gleaner_fetch::{RequestClient, RequestClientExt, RequestOptions};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::query::{build_query, AdvancedFilters};
use crate::endpoint::{build_url, require, require_segment};
use crate::pagination::{collect_pages, PageLimits};

// ============================================================================
// Constants
// ============================================================================

/// Docbase API base URL.
pub const DOCBASE_API_BASE: &str = "https://api.docbase.io";

/// Token header name.
const TOKEN_HEADER: &str = "X-DocBaseToken";

/// API version header value.
const API_VERSION: &str = "2";

/// Posts per page (Docbase maximum).
const PER_PAGE: usize = 100;

/// Page ceiling for one search (500 posts).
const MAX_PAGES: u32 = 5;

// ============================================================================
// API Types
// ============================================================================

/// Search request.
#[derive(Debug, Clone, Default)]
pub struct DocbaseSearch {
    /// Team domain (`acme` for `acme.docbase.io`).
    pub domain: String,
    /// Access token.
    pub token: String,
    /// Exact-phrase keyword.
    pub keyword: String,
    /// Optional filters.
    pub filters: AdvancedFilters,
}

/// Response from the posts endpoint.
#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    posts: Vec<DocbasePost>,
    #[serde(default)]
    meta: Option<PostsMeta>,
}

#[derive(Debug, Deserialize)]
struct PostsMeta {
    #[serde(default)]
    total: Option<u64>,
}

// ============================================================================
// API Client
// ============================================================================

/// Docbase adapter.
#[derive(Clone)]
pub struct DocbaseClient {
    client: Arc<dyn RequestClient>,
    base_url: String,
}

impl DocbaseClient {
    /// Creates an adapter over the given request client.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            base_url: DOCBASE_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the posts URL for one page of a query.
    pub fn posts_url(&self, domain: &str, query: &str, page: u32) -> Result<String, ApiError> {
        let domain = require_segment("domain", domain)?;
        let page = page.to_string();
        let per_page = PER_PAGE.to_string();
        build_url(
            &self.base_url,
            &format!("/teams/{domain}/posts"),
            &[("q", query), ("page", &page), ("per_page", &per_page)],
        )
    }

    /// Searches posts, following pages up to 500 results.
    ///
    /// An empty keyword with no filters returns an empty list without any
    /// request. A failure on any page fails the whole search.
    #[instrument(skip(self, search), fields(domain = %search.domain))]
    pub async fn search_posts(&self, search: &DocbaseSearch) -> Result<Vec<DocbasePost>, ApiError> {
        let query = build_query(&search.keyword, &search.filters);
        if (search.keyword.trim().is_empty() && search.filters.is_empty()) || query.is_empty() {
            debug!("Empty Docbase query, skipping request");
            return Ok(Vec::new());
        }

        let domain = require_segment("domain", &search.domain)?;
        let token = require("token", &search.token)?;
        search.filters.validate()?;

        let options = RequestOptions::get()
            .header(TOKEN_HEADER, token)
            .header("X-Api-Version", API_VERSION);

        let posts = collect_pages(PageLimits::new(PER_PAGE, MAX_PAGES), |page| {
            let options = &options;
            let query = &query;
            async move {
                let url = self.posts_url(domain, query, page)?;
                let response: PostsResponse = self.client.request(&url, options).await?;
                if let Some(total) = response.meta.as_ref().and_then(|m| m.total) {
                    debug!(page, total, "Docbase page");
                }
                Ok(response.posts)
            }
        })
        .await?;

        info!(count = posts.len(), "Docbase search complete");
        Ok(posts)
    }
}

impl std::fmt::Debug for DocbaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocbaseClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
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

    fn posts(start: u64, count: u64) -> Value {
        let posts: Vec<Value> = (start..start + count)
            .map(|id| json!({"id": id, "title": format!("Post {id}")}))
            .collect();
        json!({"posts": posts, "meta": {"total": 150}})
    }

    fn search(keyword: &str) -> DocbaseSearch {
        DocbaseSearch {
            domain: "acme".into(),
            token: "secret".into(),
            keyword: keyword.into(),
            filters: AdvancedFilters::default(),
        }
    }

    fn adapter(responses: Vec<MockResponse>) -> (Arc<MockRequestClient>, DocbaseClient) {
        let mock = Arc::new(MockRequestClient::with_responses(responses));
        let client = DocbaseClient::new(mock.clone());
        (mock, client)
    }

    fn page_url(query: &str, page: u32) -> String {
        DocbaseClient::new(Arc::new(MockRequestClient::new()))
            .posts_url("acme", query, page)
            .unwrap()
    }

    #[test]
    fn test_posts_url() {
        assert_eq!(
            page_url("\"rust\"", 2),
            "https://api.docbase.io/teams/acme/posts?q=%22rust%22&page=2&per_page=100"
        );
    }

    #[tokio::test]
    async fn test_empty_search_makes_no_request() {
        let (mock, client) = adapter(vec![]);

        let result = client.search_posts(&search("")).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_aggregates_pages_in_order() {
        let (mock, client) = adapter(vec![
            MockResponse::ok(page_url("\"rust\"", 1), posts(1, 100)),
            MockResponse::ok(page_url("\"rust\"", 2), posts(101, 50)),
        ]);

        let result = client.search_posts(&search("rust")).await.unwrap();

        assert_eq!(result.len(), 150);
        let ids: Vec<u64> = result.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=150).collect::<Vec<_>>());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_stops_at_five_pages() {
        let responses = (1..=6)
            .map(|page| MockResponse::ok(page_url("\"all\"", page), posts(u64::from(page) * 1000, 100)))
            .collect();
        let (mock, client) = adapter(responses);

        let result = client.search_posts(&search("all")).await.unwrap();

        assert_eq!(result.len(), 500);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn test_page_failure_discards_everything() {
        let (_, client) = adapter(vec![
            MockResponse::ok(page_url("\"rust\"", 1), posts(1, 100)),
            MockResponse::status(page_url("\"rust\"", 2), 429),
        ]);

        let err = client.search_posts(&search("rust")).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::RateLimit);
    }

    #[tokio::test]
    async fn test_token_sent_as_header_only() {
        let (mock, client) = adapter(vec![MockResponse::ok(page_url("\"rust\"", 1), posts(1, 3))]);

        client.search_posts(&search("rust")).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].header("X-DocBaseToken"), Some("secret"));
        assert!(!calls[0].url.contains("secret"));
    }

    #[tokio::test]
    async fn test_filters_only_search() {
        let mut request = search("");
        request.filters.tags = "ops".into();
        request.filters.author = "hanako".into();
        let (_, client) = adapter(vec![MockResponse::ok(
            page_url("tag:ops author:hanako", 1),
            posts(1, 2),
        )]);

        let result = client.search_posts(&request).await.unwrap();
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_from_status() {
        let (_, client) = adapter(vec![MockResponse::status(page_url("\"rust\"", 1), 401)]);

        let err = client.search_posts(&search("rust")).await.unwrap_err();
        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_missing_token_is_validation() {
        let mut request = search("rust");
        request.token = " ".into();
        let (mock, client) = adapter(vec![]);

        let err = client.search_posts(&request).await.unwrap_err();
        assert!(err.is_local());
        assert_eq!(mock.call_count(), 0);
    }
}
