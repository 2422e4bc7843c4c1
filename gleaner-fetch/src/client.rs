//! The fallible request contract every adapter talks to.
//!
//! Adapters hold an `Arc<dyn RequestClient>` and never touch the transport
//! directly, so tests can swap in [`crate::MockRequestClient`] without
//! changing adapter code.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use gleaner_core::ApiError;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::status::error_for_status;

// ============================================================================
// Request Options
// ============================================================================

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON body.
    Json(Value),
    /// `application/x-www-form-urlencoded` body.
    Form(Vec<(String, String)>),
}

/// Translates a non-success JSON body into a vendor error.
///
/// Returning `None` falls back to the HTTP status table.
pub type ErrorBodyMapper = fn(&Value) -> Option<ApiError>;

/// Method, headers and body of one request.
///
/// The URL, query string included, is passed separately.
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// HTTP method. Defaults to GET.
    pub method: Method,
    /// Extra headers, applied in order.
    pub headers: Vec<(String, String)>,
    /// Optional body.
    pub body: Option<RequestBody>,
    /// Vendor translation for non-success bodies, consulted before the status table.
    pub error_body: Option<ErrorBodyMapper>,
}

impl RequestOptions {
    /// Creates options for a GET request.
    pub fn get() -> Self {
        Self::default()
    }

    /// Creates options for a POST request.
    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds an `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(self, token: &str) -> Self {
        self.header("Authorization", format!("Bearer {token}"))
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// Sets a form-encoded body.
    #[must_use]
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    /// Lets `mapper` classify non-success responses from their JSON body.
    ///
    /// The mapped error still goes through the retry policy, so a vendor
    /// rate-limit code is retried like a 429.
    #[must_use]
    pub fn map_error_body(mut self, mapper: ErrorBodyMapper) -> Self {
        self.error_body = Some(mapper);
        self
    }

    /// Builds the error for a non-success response.
    ///
    /// A parseable body claimed by the [`ErrorBodyMapper`] wins over the status.
    pub fn status_error(&self, status: u16, detail: &str) -> ApiError {
        self.error_body
            .and_then(|mapper| {
                let body: Value = serde_json::from_str(detail).ok()?;
                mapper(&body)
            })
            .unwrap_or_else(|| error_for_status(status, detail))
    }

    /// Returns the value of the first header with the given name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RequestOptions {
    // Header values carry credentials; only names are printed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("RequestOptions")
            .field("method", &self.method)
            .field("headers", &names)
            .field("body", &self.body.is_some())
            .field("error_body", &self.error_body.is_some())
            .finish()
    }
}

// ============================================================================
// Request Client Trait
// ============================================================================

/// Performs one logical request and reports the outcome as a `Result`.
///
/// Implementations never panic on upstream failures. Transport errors,
/// non-success statuses and unparseable bodies all end up as [`ApiError`].
#[async_trait]
pub trait RequestClient: Send + Sync {
    /// Sends the request and returns the parsed JSON body.
    async fn request_value(&self, url: &str, options: &RequestOptions) -> Result<Value, ApiError>;
}

/// Typed convenience over [`RequestClient`].
pub trait RequestClientExt: RequestClient {
    /// Sends the request and deserializes the body into `T`.
    ///
    /// A body whose shape does not match `T` is reported as a network error.
    fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<T, ApiError>> + Send;
}

impl<C: RequestClient + ?Sized> RequestClientExt for C {
    fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        options: &RequestOptions,
    ) -> impl Future<Output = Result<T, ApiError>> + Send {
        async move {
            let value = self.request_value(url, options).await?;
            decode(value)
        }
    }
}

/// Deserializes a JSON value, mapping shape mismatches to network errors.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::network(format!("Malformed response body: {e}")).with_cause(e))
}

// ============================================================================
// Tests
// ============================================================================
