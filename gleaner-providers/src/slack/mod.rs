//! Slack adapter.
//!
//! Slack answers most failures with HTTP 200 and `{"ok": false}`, so every
//! response passes the envelope gate before its payload is read.

mod api;
mod collector;
mod envelope;
mod error;

pub use api::{SlackClient, SLACK_API_BASE};
pub use collector::{
    CollectOptions, CollectionFailure, CollectionStage, SlackThreadCollector, ThreadCollection,
};
pub use error::{map_slack_error, UNKNOWN_ERROR_CODE};
