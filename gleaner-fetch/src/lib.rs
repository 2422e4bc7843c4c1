// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Gleaner Fetch
//!
//! The request layer every Gleaner adapter sits on.
//!
//! ## Request Client
//!
//! - [`client::RequestClient`] - Object-safe contract: URL + options in,
//!   `Result<serde_json::Value, ApiError>` out
//! - [`client::RequestClientExt`] - Typed `request::<T>()` on top of it
//! - [`http::HttpRequestClient`] - reqwest implementation with retries
//! - [`mock::MockRequestClient`] - Table-driven implementation for tests
//!
//! ## Failure Handling
//!
//! - [`retry::RetryConfig`] - Exponential backoff keyed by error kind
//! - [`status`] - Fixed HTTP status to error kind table
//!
//! ## Example
//!
//! ```ignore
//! use gleaner_fetch::{HttpRequestClient, RequestClientExt, RequestOptions, RetryConfig};
//!
//! let client = HttpRequestClient::new()?.with_retry_config(RetryConfig::new(2));
//! let options = RequestOptions::get().bearer(&token);
//! let user: serde_json::Value = client.request("https://api.github.com/user", &options).await?;
//! ```

pub mod client;
pub mod http;
pub mod mock;
pub mod retry;
pub mod status;

// Re-export key types at crate root
pub use client::{decode, ErrorBodyMapper, RequestBody, RequestClient, RequestClientExt, RequestOptions};
pub use http::HttpRequestClient;
pub use mock::{MockRequestClient, MockResponse, RecordedRequest};
pub use retry::RetryConfig;
pub use status::{error_for_status, kind_for_status};
