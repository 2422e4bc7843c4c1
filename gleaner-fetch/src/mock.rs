//! Table-driven request client for tests.
//!
//! Returns canned responses keyed by exact `(url, method)` with no delay and
//! no retries. Its success and failure shapes match [`crate::HttpRequestClient`],
//! so adapters cannot tell the two apart except by timing.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use gleaner_core::ApiError;
use serde_json::Value;
use tracing::debug;

use crate::client::{RequestBody, RequestClient, RequestOptions};
use crate::status::kind_for_status;

// ============================================================================
// Mock Response
// ============================================================================

/// One canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Exact URL, query string included.
    pub url: String,
    /// Uppercase HTTP method.
    pub method: String,
    /// HTTP status to simulate.
    pub status: u16,
    /// Body returned on success.
    pub data: Option<Value>,
    /// Error returned regardless of status.
    pub error: Option<ApiError>,
}

impl MockResponse {
    /// A `200 OK` GET response with the given body.
    pub fn ok(url: impl Into<String>, data: Value) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            status: 200,
            data: Some(data),
            error: None,
        }
    }

    /// A GET response with the given status and no body.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            status,
            data: None,
            error: None,
        }
    }

    /// A GET response that fails with the given error.
    pub fn error(url: impl Into<String>, error: ApiError) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            status: 200,
            data: None,
            error: Some(error),
        }
    }

    /// Sets the method (normalized to uppercase).
    #[must_use]
    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    /// Sets the body. On a non-success status it is only seen by an
    /// [`crate::ErrorBodyMapper`].
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn outcome(&self, options: &RequestOptions) -> Result<Value, ApiError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if (200..300).contains(&self.status) {
            return Ok(self.data.clone().unwrap_or(Value::Null));
        }
        if let (Some(mapper), Some(data)) = (options.error_body, &self.data) {
            if let Some(err) = mapper(data) {
                return Err(err);
            }
        }
        Err(ApiError::from_kind(
            kind_for_status(self.status),
            format!("Mock response returned status {}", self.status),
        ))
    }
}

// ============================================================================
// Recorded Request
// ============================================================================

/// A request seen by the mock client.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Uppercase method.
    pub method: String,
    /// Requested URL.
    pub url: String,
    /// Header pairs as sent.
    pub headers: Vec<(String, String)>,
    /// Body as sent.
    pub body: Option<RequestBody>,
}

impl RecordedRequest {
    /// Returns the value of the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Mock Request Client
// ============================================================================

/// Deterministic [`RequestClient`] backed by a response table.
#[derive(Debug, Default)]
pub struct MockRequestClient {
    responses: HashMap<(String, String), MockResponse>,
    calls: Mutex<Vec<RecordedRequest>>,
}

impl MockRequestClient {
    /// Creates a client with no responses; every request is unmatched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client from a response table.
    ///
    /// A later entry for the same `(url, method)` replaces an earlier one.
    pub fn with_responses(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        let mut client = Self::new();
        for response in responses {
            client.insert(response);
        }
        client
    }

    /// Adds or replaces a response.
    pub fn insert(&mut self, response: MockResponse) {
        let key = (response.url.clone(), response.method.to_ascii_uppercase());
        self.responses.insert(key, response);
    }

    /// Returns every request received so far, in order.
    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns the URLs requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

#[async_trait]
impl RequestClient for MockRequestClient {
    async fn request_value(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        let method = options.method.as_str().to_ascii_uppercase();
        debug!(%method, url, "Mock request");

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedRequest {
                method: method.clone(),
                url: url.to_string(),
                headers: options.headers.clone(),
                body: options.body.clone(),
            });

        match self.responses.get(&(url.to_string(), method.clone())) {
            Some(response) => response.outcome(options),
            None => Err(ApiError::not_found(format!(
                "No mock response for {method} {url}"
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestClientExt;
    use gleaner_core::ApiErrorKind;
    use serde_json::json;

    const URL: &str = "https://api.example.com/items?page=1";

    #[tokio::test]
    async fn test_exact_match_returns_data() {
        let client = MockRequestClient::with_responses([MockResponse::ok(URL, json!({"n": 1}))]);

        let value = client.request_value(URL, &RequestOptions::get()).await.unwrap();
        assert_eq!(value, json!({"n": 1}));
    }

    #[tokio::test]
    async fn test_query_string_must_match() {
        let client = MockRequestClient::with_responses([MockResponse::ok(URL, json!({}))]);

        let err = client
            .request_value("https://api.example.com/items?page=2", &RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::NotFound);
        assert!(err.message().contains("GET https://api.example.com/items?page=2"));
    }

    #[tokio::test]
    async fn test_method_is_normalized() {
        let client = MockRequestClient::with_responses([
            MockResponse::ok(URL, json!("posted")).with_method("post"),
        ]);

        let posted = client.request_value(URL, &RequestOptions::post()).await.unwrap();
        assert_eq!(posted, json!("posted"));

        let err = client.request_value(URL, &RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_error_wins_over_status() {
        let client = MockRequestClient::with_responses([
            MockResponse::error(URL, ApiError::rate_limit("slow")).with_data(json!({})),
        ]);

        let err = client.request_value(URL, &RequestOptions::get()).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::RateLimit);
    }

    #[tokio::test]
    async fn test_status_maps_through_table() {
        let client = MockRequestClient::with_responses([
            MockResponse::status("https://a/401", 401),
            MockResponse::status("https://a/403", 403),
            MockResponse::status("https://a/500", 500),
        ]);

        let cases = [
            ("https://a/401", ApiErrorKind::Unauthorized),
            ("https://a/403", ApiErrorKind::MissingScope),
            ("https://a/500", ApiErrorKind::Network),
        ];
        for (url, expected) in cases {
            let err = client.request_value(url, &RequestOptions::get()).await.unwrap_err();
            assert_eq!(err.kind(), expected, "{url}");
            assert!(err.message().starts_with("Mock response returned status"));
        }
    }

    #[tokio::test]
    async fn test_error_body_mapper_sees_status_data() {
        fn vendor_error(body: &Value) -> Option<ApiError> {
            (body.get("error")? == "bad_token").then(|| ApiError::unauthorized("bad_token"))
        }

        let client = MockRequestClient::with_responses([
            MockResponse::status(URL, 400).with_data(json!({"error": "bad_token"})),
        ]);

        let plain = client.request_value(URL, &RequestOptions::get()).await.unwrap_err();
        assert_eq!(plain.kind(), ApiErrorKind::Validation);

        let options = RequestOptions::get().map_error_body(vendor_error);
        let mapped = client.request_value(URL, &options).await.unwrap_err();
        assert_eq!(mapped.kind(), ApiErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn test_success_without_data_is_null() {
        let client = MockRequestClient::with_responses([MockResponse::status(URL, 204)]);
        let value = client.request_value(URL, &RequestOptions::get()).await.unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let client = MockRequestClient::with_responses([
            MockResponse::ok(URL, json!({"n": 1})),
            MockResponse::status("https://a/404", 404),
        ]);

        let first = client.request_value(URL, &RequestOptions::get()).await.unwrap();
        let second = client.request_value(URL, &RequestOptions::get()).await.unwrap();
        assert_eq!(first, second);

        let e1 = client.request_value("https://a/404", &RequestOptions::get()).await.unwrap_err();
        let e2 = client.request_value("https://a/404", &RequestOptions::get()).await.unwrap_err();
        assert_eq!(e1.kind(), e2.kind());
        assert_eq!(e1.message(), e2.message());
        assert_eq!(client.call_count(), 4);
    }

    #[tokio::test]
    async fn test_records_headers_and_typed_decode() {
        #[derive(serde::Deserialize)]
        struct Item {
            n: u32,
        }

        let client = MockRequestClient::with_responses([MockResponse::ok(URL, json!({"n": 7}))]);
        let options = RequestOptions::get().bearer("tok");

        let item: Item = client.request(URL, &options).await.unwrap();
        assert_eq!(item.n, 7);

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].header("Authorization"), Some("Bearer tok"));
    }
}
