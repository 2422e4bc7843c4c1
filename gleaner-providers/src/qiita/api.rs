//! Qiita API v2 client.

use std::sync::Arc;

use gleaner_core::{ApiError, QiitaItem};
use gleaner_fetch::{RequestClient, RequestClientExt, RequestOptions};
use tracing::{info, instrument};

use crate::endpoint::{build_url, optional_bearer, require, require_segment};
use crate::pagination::{collect_pages, PageLimits};

/// Qiita API base URL.
pub const QIITA_API_BASE: &str = "https://qiita.com/api/v2";

const PER_PAGE: usize = 100;
const MAX_PAGES: u32 = 5;

/// Qiita adapter.
#[derive(Clone)]
pub struct QiitaClient {
    client: Arc<dyn RequestClient>,
    base_url: String,
}

impl QiitaClient {
    /// Creates an adapter over the given request client.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            base_url: QIITA_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL (Qiita Team: `https://<team>.qiita.com/api/v2`).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub(crate) fn items_url(&self, path: &str, query: Option<&str>, page: u32) -> Result<String, ApiError> {
        let (page, per_page) = (page.to_string(), PER_PAGE.to_string());
        let mut params = Vec::with_capacity(3);
        if let Some(query) = query {
            params.push(("query", query));
        }
        params.push(("page", page.as_str()));
        params.push(("per_page", per_page.as_str()));
        build_url(&self.base_url, path, &params)
    }

    async fn fetch_items(
        &self,
        token: Option<&str>,
        path: &str,
        query: Option<&str>,
    ) -> Result<Vec<QiitaItem>, ApiError> {
        let options = optional_bearer(RequestOptions::get(), token);
        collect_pages(PageLimits::new(PER_PAGE, MAX_PAGES), |page| {
            let options = &options;
            async move {
                let url = self.items_url(path, query, page)?;
                self.client.request::<Vec<QiitaItem>>(&url, options).await
            }
        })
        .await
    }

    /// Searches items with Qiita's query syntax (`tag:rust user:alice`).
    #[instrument(skip(self, token))]
    pub async fn search_items(&self, token: Option<&str>, query: &str) -> Result<Vec<QiitaItem>, ApiError> {
        let query = require("query", query)?;
        let items = self.fetch_items(token, "/items", Some(query)).await?;
        info!(count = items.len(), "Qiita search complete");
        Ok(items)
    }

    /// Lists one user's items, newest first.
    #[instrument(skip(self, token))]
    pub async fn list_user_items(&self, token: Option<&str>, user_id: &str) -> Result<Vec<QiitaItem>, ApiError> {
        let user_id = require_segment("user", user_id)?;
        self.fetch_items(token, &format!("/users/{user_id}/items"), None).await
    }
}

impl std::fmt::Debug for QiitaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QiitaClient")
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

    fn urls() -> QiitaClient {
        QiitaClient::new(Arc::new(MockRequestClient::new()))
    }

    fn items(count: usize) -> Value {
        let items: Vec<Value> = (0..count)
            .map(|i| json!({"id": format!("{i:020x}"), "title": format!("Item {i}"), "tags": [{"name": "Rust"}]}))
            .collect();
        json!(items)
    }

    #[test]
    fn test_items_url() {
        assert_eq!(
            urls().items_url("/items", Some("tag:rust"), 1).unwrap(),
            "https://qiita.com/api/v2/items?query=tag%3Arust&page=1&per_page=100"
        );
    }

    #[tokio::test]
    async fn test_search_items() {
        let mock = Arc::new(MockRequestClient::with_responses([
            MockResponse::ok(urls().items_url("/items", Some("tokio"), 1).unwrap(), items(100)),
            MockResponse::ok(urls().items_url("/items", Some("tokio"), 2).unwrap(), items(1)),
        ]));
        let client = QiitaClient::new(mock.clone());

        let result = client.search_items(Some("qiita-token"), "tokio").await.unwrap();

        assert_eq!(result.len(), 101);
        assert_eq!(result[0].tags[0].name, "Rust");
        assert_eq!(mock.calls()[0].header("Authorization"), Some("Bearer qiita-token"));
    }

    #[tokio::test]
    async fn test_user_items() {
        let url = urls().items_url("/users/alice/items", None, 1).unwrap();
        assert_eq!(url, "https://qiita.com/api/v2/users/alice/items?page=1&per_page=100");
        let client = QiitaClient::new(Arc::new(MockRequestClient::with_responses([MockResponse::ok(
            url,
            items(3),
        )])));

        let result = client.list_user_items(None, "alice").await.unwrap();
        assert_eq!(result.len(), 3);
    }

    #[tokio::test]
    async fn test_validation() {
        let client = urls();
        let err = client.search_items(None, " ").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Validation);

        let err = client.list_user_items(None, "").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_missing_scope() {
        let url = urls().items_url("/items", Some("secret"), 1).unwrap();
        let client = QiitaClient::new(Arc::new(MockRequestClient::with_responses([MockResponse::status(url, 403)])));

        let err = client.search_items(None, "secret").await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::MissingScope);
    }
}
