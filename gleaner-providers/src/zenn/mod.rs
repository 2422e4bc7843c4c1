//! Zenn adapter.
//!
//! Zenn has no official public API; these are the unauthenticated JSON
//! endpoints behind zenn.dev.

mod api;

pub use api::{ZennClient, ZENN_API_BASE};
