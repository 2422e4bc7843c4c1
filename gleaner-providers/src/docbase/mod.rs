//! Docbase adapter.
//!
//! Authenticates with the `X-DocBaseToken` header and searches one team's
//! posts with page-number pagination.

mod api;
mod query;

pub use api::{DocbaseClient, DocbaseSearch, DOCBASE_API_BASE};
pub use query::{build_query, AdvancedFilters};
