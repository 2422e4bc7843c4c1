//! Zenn API client.

use std::sync::Arc;

use gleaner_core::{ApiError, ZennArticle};
use gleaner_fetch::{RequestClient, RequestClientExt, RequestOptions};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::endpoint::{build_url, require_segment};

/// Zenn API base URL.
pub const ZENN_API_BASE: &str = "https://zenn.dev/api";

/// Article list pages followed at most.
const MAX_PAGES: u32 = 5;

#[derive(Debug, Deserialize)]
struct ArticleListResponse {
    #[serde(default)]
    articles: Vec<ZennArticle>,
    #[serde(default)]
    next_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ArticleResponse {
    article: ZennArticle,
}

/// Zenn adapter. Unauthenticated.
#[derive(Clone)]
pub struct ZennClient {
    client: Arc<dyn RequestClient>,
    base_url: String,
}

impl ZennClient {
    /// Creates an adapter over the given request client.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            base_url: ZENN_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn articles_url(&self, username: &str, page: u32) -> Result<String, ApiError> {
        let page = page.to_string();
        build_url(
            &self.base_url,
            "/articles",
            &[("username", username), ("order", "latest"), ("page", &page)],
        )
    }

    pub(crate) fn article_url(&self, slug: &str) -> Result<String, ApiError> {
        build_url(&self.base_url, &format!("/articles/{slug}"), &[])
    }

    /// Lists a user's articles, newest first, following `next_page`.
    #[instrument(skip(self))]
    pub async fn list_user_articles(&self, username: &str) -> Result<Vec<ZennArticle>, ApiError> {
        let username = require_segment("username", username)?;
        let options = RequestOptions::get();

        let mut articles = Vec::new();
        let mut page = 1;
        for _ in 0..MAX_PAGES {
            let url = self.articles_url(username, page)?;
            let response: ArticleListResponse = self.client.request(&url, &options).await?;
            articles.extend(response.articles);
            debug!(page, total = articles.len(), next = ?response.next_page, "Zenn articles page");

            // Only a strictly increasing next_page is followed.
            match response.next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        info!(count = articles.len(), "Zenn article list complete");
        Ok(articles)
    }

    /// Fetches one article including its rendered body.
    #[instrument(skip(self))]
    pub async fn get_article(&self, slug: &str) -> Result<ZennArticle, ApiError> {
        let slug = require_segment("slug", slug)?;
        let url = self.article_url(slug)?;
        let response: ArticleResponse = self.client.request(&url, &RequestOptions::get()).await?;
        Ok(response.article)
    }
}

impl std::fmt::Debug for ZennClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZennClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_core::ApiErrorKind;
    use gleaner_fetch::{MockRequestClient, MockResponse};
    use serde_json::{json, Value};

    fn urls() -> ZennClient {
        ZennClient::new(Arc::new(MockRequestClient::new()))
    }

    fn page(ids: std::ops::Range<u64>, next_page: Option<u32>) -> Value {
        let articles: Vec<Value> = ids
            .map(|id| json!({"id": id, "slug": format!("a{id}"), "path": format!("/kuro/articles/a{id}")}))
            .collect();
        json!({"articles": articles, "next_page": next_page})
    }

    fn client(responses: Vec<MockResponse>) -> (Arc<MockRequestClient>, ZennClient) {
        let mock = Arc::new(MockRequestClient::with_responses(responses));
        (mock.clone(), ZennClient::new(mock))
    }

    #[test]
    fn test_articles_url() {
        assert_eq!(
            urls().articles_url("kuro", 2).unwrap(),
            "https://zenn.dev/api/articles?username=kuro&order=latest&page=2"
        );
    }

    #[tokio::test]
    async fn test_follows_next_page() {
        let (mock, zenn) = client(vec![
            MockResponse::ok(urls().articles_url("kuro", 1).unwrap(), page(0..48, Some(2))),
            MockResponse::ok(urls().articles_url("kuro", 2).unwrap(), page(48..50, None)),
        ]);

        let articles = zenn.list_user_articles("kuro").await.unwrap();

        assert_eq!(articles.len(), 50);
        assert_eq!(articles[49].url(), "https://zenn.dev/kuro/articles/a49");
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_page_ceiling() {
        let responses = (1..=6)
            .map(|n| MockResponse::ok(urls().articles_url("kuro", n).unwrap(), page(0..1, Some(n + 1))))
            .collect();
        let (mock, zenn) = client(responses);

        let articles = zenn.list_user_articles("kuro").await.unwrap();

        assert_eq!(articles.len(), 5);
        assert_eq!(mock.call_count(), 5);
    }

    #[tokio::test]
    async fn test_get_article() {
        let (_, zenn) = client(vec![MockResponse::ok(
            urls().article_url("rust-retry").unwrap(),
            json!({"article": {"id": 1, "slug": "rust-retry", "body_html": "<p>hi</p>"}}),
        )]);

        let article = zenn.get_article("rust-retry").await.unwrap();
        assert_eq!(article.body_html.as_deref(), Some("<p>hi</p>"));
    }

    #[tokio::test]
    async fn test_validation_and_not_found() {
        let (mock, zenn) = client(vec![]);

        let err = zenn.get_article("").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Validation);
        assert_eq!(mock.call_count(), 0);

        // Unknown slugs fall through the mock table as not found.
        let err = zenn.get_article("missing").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
    }
}
