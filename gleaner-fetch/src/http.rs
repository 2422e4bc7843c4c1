//! HTTP request client with retries and tracing.
//!
//! This is the single choke point through which every outbound call passes.
//! It adds:
//! - Status code classification via [`crate::status`]
//! - Transport and body-parse failures mapped to network errors
//! - Exponential backoff retries per [`RetryConfig`]
//! - Request/attempt tracing

use std::time::Duration;

use async_trait::async_trait;
use gleaner_core::ApiError;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::{RequestBody, RequestClient, RequestOptions};
use crate::retry::RetryConfig;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for Gleaner.
const USER_AGENT: &str = concat!("Gleaner/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// HTTP Request Client
// ============================================================================

/// Request client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRequestClient {
    inner: Client,
    retry: RetryConfig,
}

impl HttpRequestClient {
    /// Creates a new client with default timeout and retry policy.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ApiError::unknown(format!("Failed to create HTTP client: {e}")).with_cause(e)
            })?;

        Ok(Self {
            inner: client,
            retry: RetryConfig::default(),
        })
    }

    /// Sets the retry policy for this client.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the retry policy.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    /// Performs a single attempt with no retry.
    async fn attempt(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        let mut builder = self.inner.request(options.method.clone(), url);
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &options.body {
            Some(RequestBody::Json(body)) => builder.json(body),
            Some(RequestBody::Form(pairs)) => builder.form(pairs),
            None => builder,
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        debug!(status = %status, "Response received");

        if !status.is_success() {
            let detail = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    debug!(status = %status, error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(options.status_error(status.as_u16(), &detail));
        }

        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::network(format!("Invalid JSON response: {e}")).with_cause(e)
        })
    }
}

#[async_trait]
impl RequestClient for HttpRequestClient {
    #[instrument(skip(self, options), fields(method = %options.method))]
    async fn request_value(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        self.retry
            .run(|attempt| {
                debug!(attempt, "Sending request");
                self.attempt(url, options)
            })
            .await
    }
}

/// Converts a transport failure into a network error.
fn transport_error(err: reqwest::Error) -> ApiError {
    let message = if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Connection failed: {err}")
    } else {
        err.to_string()
    };
    ApiError::network(message).with_cause(err)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RequestClientExt;
    use gleaner_core::ApiErrorKind;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_client(max_retries: u32) -> HttpRequestClient {
        HttpRequestClient::new()
            .unwrap()
            .with_retry_config(RetryConfig::new(max_retries).with_initial_backoff(Duration::from_millis(5)))
    }

    #[derive(Debug, Deserialize)]
    struct Greeting {
        message: String,
    }

    #[tokio::test]
    async fn test_success_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/hello"))
            .and(header("X-Test", "yes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "hi"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = fast_client(3);
        let options = RequestOptions::get().header("X-Test", "yes");
        let greeting: Greeting = client
            .request(&format!("{}/hello", server.uri()), &options)
            .await
            .unwrap();

        assert_eq!(greeting.message, "hi");
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let server = MockServer::start().await;
        for (status, route) in [(400, "/400"), (401, "/401"), (403, "/403"), (404, "/404")] {
            Mock::given(path(route))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;
        }

        let client = fast_client(0);
        let cases = [
            ("/400", ApiErrorKind::Validation),
            ("/401", ApiErrorKind::Unauthorized),
            ("/403", ApiErrorKind::MissingScope),
            ("/404", ApiErrorKind::NotFound),
        ];
        for (route, expected) in cases {
            let err = client
                .request_value(&format!("{}{route}", server.uri()), &RequestOptions::get())
                .await
                .unwrap_err();
            assert_eq!(err.kind(), expected, "route {route}");
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(path("/secure"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let err = fast_client(3)
            .request_value(&format!("{}/secure", server.uri()), &RequestOptions::get())
            .await
            .unwrap_err();

        assert!(err.is_auth_failure());
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_until_exhausted() {
        let server = MockServer::start().await;
        Mock::given(path("/busy"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let err = fast_client(2)
            .request_value(&format!("{}/busy", server.uri()), &RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::RateLimit);
    }

    fn vendor_error(body: &Value) -> Option<ApiError> {
        match body.get("error").and_then(Value::as_str)? {
            "bad_token" => Some(ApiError::unauthorized("bad_token")),
            "slow_down" => Some(ApiError::rate_limit("slow_down")),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_error_body_mapper_wins_over_status() {
        let server = MockServer::start().await;
        Mock::given(path("/vendor"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad_token"})))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions::get().map_error_body(vendor_error);
        let err = fast_client(3)
            .request_value(&format!("{}/vendor", server.uri()), &options)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Unauthorized);
        assert_eq!(err.message(), "bad_token");
    }

    #[tokio::test]
    async fn test_mapped_rate_limit_is_retried() {
        let server = MockServer::start().await;
        Mock::given(path("/vendor"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "slow_down"})))
            .expect(2)
            .mount(&server)
            .await;

        let options = RequestOptions::get().map_error_body(vendor_error);
        let err = fast_client(1)
            .request_value(&format!("{}/vendor", server.uri()), &options)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::RateLimit);
    }

    #[tokio::test]
    async fn test_server_error_is_network_with_body() {
        let server = MockServer::start().await;
        Mock::given(path("/boom"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .expect(2)
            .mount(&server)
            .await;

        let err = fast_client(1)
            .request_value(&format!("{}/boom", server.uri()), &RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Network);
        assert!(err.message().contains("502"));
        assert!(err.message().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_network_with_cause() {
        let server = MockServer::start().await;
        Mock::given(path("/html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = fast_client(0)
            .request_value(&format!("{}/html", server.uri()), &RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Network);
        assert!(err.cause().is_some());
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let value = fast_client(0)
            .request_value(&format!("{}/empty", server.uri()), &RequestOptions::get())
            .await
            .unwrap();

        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_form_post() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/form"))
            .and(body_string_contains("channel=C1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions::post().form([("channel", "C1")]);
        let value = fast_client(0)
            .request_value(&format!("{}/form", server.uri()), &options)
            .await
            .unwrap();

        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        // Port 9 (discard) is closed on test machines.
        let err = fast_client(1)
            .request_value("http://127.0.0.1:9/", &RequestOptions::get())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ApiErrorKind::Network);
        assert!(err.cause().is_some());
    }
}
