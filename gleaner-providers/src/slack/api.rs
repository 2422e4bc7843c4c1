//! Slack Web API client.

use std::sync::Arc;

use gleaner_core::{ApiError, SlackMessage, SlackSearchPage, SlackUser};
use gleaner_fetch::{RequestClient, RequestOptions};
use serde_json::Value;
use tracing::{debug, instrument};

use super::envelope::{
    check_envelope, envelope_error, next_cursor, parse_messages, parse_permalink,
    parse_search_page, parse_user,
};
use crate::endpoint::{build_url, require};

// ============================================================================
// Constants
// ============================================================================

/// Slack Web API base URL.
pub const SLACK_API_BASE: &str = "https://slack.com/api";

/// Messages per `conversations.replies` page.
const REPLIES_LIMIT: u32 = 200;

/// Page ceiling for one thread.
const MAX_REPLY_PAGES: u32 = 10;

// ============================================================================
// API Client
// ============================================================================

/// Slack adapter.
///
/// Every response is gated on the envelope's `ok` flag before any payload
/// field is read, whatever the HTTP status was.
#[derive(Clone)]
pub struct SlackClient {
    client: Arc<dyn RequestClient>,
    base_url: String,
}

impl SlackClient {
    /// Creates an adapter over the given request client.
    pub fn new(client: Arc<dyn RequestClient>) -> Self {
        Self {
            client,
            base_url: SLACK_API_BASE.to_string(),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
        build_url(&self.base_url, &format!("/{method}"), params)
    }

    pub(crate) fn search_url(&self, query: &str, count: u32, page: u32) -> Result<String, ApiError> {
        let (count, page) = (count.to_string(), page.to_string());
        self.method_url("search.messages", &[("query", query), ("count", &count), ("page", &page)])
    }

    pub(crate) fn replies_url(
        &self,
        channel: &str,
        thread_ts: &str,
        cursor: Option<&str>,
    ) -> Result<String, ApiError> {
        let limit = REPLIES_LIMIT.to_string();
        let mut params = vec![("channel", channel), ("ts", thread_ts), ("limit", limit.as_str())];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor));
        }
        self.method_url("conversations.replies", &params)
    }

    pub(crate) fn permalink_url(&self, channel: &str, message_ts: &str) -> Result<String, ApiError> {
        self.method_url("chat.getPermalink", &[("channel", channel), ("message_ts", message_ts)])
    }

    pub(crate) fn user_url(&self, user_id: &str) -> Result<String, ApiError> {
        self.method_url("users.info", &[("user", user_id)])
    }

    /// Sends one authenticated GET and returns the body once the envelope is `ok`.
    async fn call(&self, url: &str, token: &str) -> Result<Value, ApiError> {
        let options = RequestOptions::get().bearer(token).map_error_body(envelope_error);
        let body = self.client.request_value(url, &options).await?;
        check_envelope(body)
    }

    /// Fetches one page of `search.messages`.
    #[instrument(skip(self, token))]
    pub async fn search_messages(
        &self,
        token: &str,
        query: &str,
        count: u32,
        page: u32,
    ) -> Result<SlackSearchPage, ApiError> {
        let token = require("token", token)?;
        let query = require("query", query)?;

        let url = self.search_url(query, count, page)?;
        let body = self.call(&url, token).await?;
        let result = parse_search_page(&body, page);

        debug!(
            matches = result.matches.len(),
            total = result.total,
            page_count = result.page_count,
            "Slack search page"
        );
        Ok(result)
    }

    /// Fetches a thread's parent and replies, following reply cursors.
    ///
    /// An empty thread is reported as not found. A failure on any page fails
    /// the whole call.
    #[instrument(skip(self, token))]
    pub async fn get_thread_messages(
        &self,
        token: &str,
        channel: &str,
        thread_ts: &str,
    ) -> Result<Vec<SlackMessage>, ApiError> {
        let token = require("token", token)?;
        let channel = require("channel", channel)?;
        let thread_ts = require("thread_ts", thread_ts)?;

        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_REPLY_PAGES {
            let url = self.replies_url(channel, thread_ts, cursor.as_deref())?;
            let body = self.call(&url, token).await?;
            messages.extend(parse_messages(&body));

            cursor = next_cursor(&body);
            debug!(page, total = messages.len(), more = cursor.is_some(), "Slack replies page");
            if cursor.is_none() {
                break;
            }
        }

        if messages.is_empty() {
            return Err(ApiError::not_found(format!(
                "Thread {thread_ts} in {channel} has no messages"
            )));
        }
        Ok(messages)
    }

    /// Fetches the permalink of one message.
    #[instrument(skip(self, token))]
    pub async fn get_permalink(
        &self,
        token: &str,
        channel: &str,
        message_ts: &str,
    ) -> Result<String, ApiError> {
        let token = require("token", token)?;
        let channel = require("channel", channel)?;
        let message_ts = require("message_ts", message_ts)?;

        let url = self.permalink_url(channel, message_ts)?;
        let body = self.call(&url, token).await?;
        parse_permalink(&body)
            .ok_or_else(|| ApiError::not_found(format!("No permalink for {message_ts} in {channel}")))
    }

    /// Fetches one user's profile.
    #[instrument(skip(self, token))]
    pub async fn get_user_info(&self, token: &str, user_id: &str) -> Result<SlackUser, ApiError> {
        let token = require("token", token)?;
        let user_id = require("user", user_id)?;

        let url = self.user_url(user_id)?;
        let body = self.call(&url, token).await?;
        parse_user(&body).ok_or_else(|| ApiError::not_found(format!("No profile for user {user_id}")))
    }
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
