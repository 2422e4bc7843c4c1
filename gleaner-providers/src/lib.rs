// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Gleaner Providers
//!
//! Service adapters built on [`gleaner_fetch::RequestClient`].
//!
//! Each adapter turns caller input into requests, follows the service's
//! pagination and translates vendor failures into [`gleaner_core::ApiError`].
//! Adapters take the request client as a constructor argument, so tests run
//! them against [`gleaner_fetch::MockRequestClient`].
//!
//! ## Supported Services
//!
//! | Service | Auth | Pagination | Operations |
//! |---------|------|------------|------------|
//! | Docbase | `X-DocBaseToken` | page, 100 x 5 | search posts |
//! | Slack | Bearer | page / cursor | search, thread, permalink, user, collect |
//! | GitHub | optional Bearer | page, 100 x 5 / 10 | search issues, comments |
//! | Qiita | optional Bearer | page, 100 x 5 | search items, user items |
//! | Zenn | none | `next_page`, 5 pages | user articles, article |
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use gleaner_fetch::HttpRequestClient;
//! use gleaner_providers::{Adapters, CollectOptions};
//!
//! let adapters = Adapters::new(Arc::new(HttpRequestClient::new()?));
//! let collection = adapters
//!     .slack_collector()
//!     .collect(&token, "deploy failed", CollectOptions::default())
//!     .await?;
//! ```

mod endpoint;
pub mod pagination;

pub mod adapters;

// Service modules (alphabetical)
pub mod docbase;
pub mod github;
pub mod qiita;
pub mod slack;
pub mod zenn;

// Re-export key types
pub use adapters::Adapters;
pub use docbase::{AdvancedFilters, DocbaseClient, DocbaseSearch};
pub use github::GitHubClient;
pub use pagination::{collect_pages, PageLimits};
pub use qiita::QiitaClient;
pub use slack::{
    CollectOptions, CollectionFailure, CollectionStage, SlackClient, SlackThreadCollector,
    ThreadCollection,
};
pub use zenn::ZennClient;
