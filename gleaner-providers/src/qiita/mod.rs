//! Qiita adapter.

mod api;

pub use api::{QiitaClient, QIITA_API_BASE};
