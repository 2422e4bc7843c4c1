//! Slack message, thread and user types.
//!
//! These are built by the Slack adapter from untyped envelopes, so every
//! field except the identifiers has a sensible empty default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parses a Slack timestamp (`"1700000000.000100"`) into UTC time.
pub fn parse_slack_ts(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = ts.split_once('.').unwrap_or((ts, "0"));
    let secs: i64 = secs.parse().ok()?;
    let micros: u32 = format!("{frac:0<6}").get(..6)?.parse().ok()?;
    DateTime::from_timestamp(secs, micros * 1_000)
}

/// Channel reference carried by search matches and threads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlackChannel {
    /// Channel ID (e.g. `C0123456`).
    pub id: String,
    /// Channel name without `#`, when known.
    #[serde(default)]
    pub name: Option<String>,
}

/// One hit returned by `search.messages`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackSearchMatch {
    /// Message timestamp.
    pub ts: String,
    /// Parent thread timestamp, if the hit is a reply or a parent.
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Author user ID.
    #[serde(default)]
    pub user: Option<String>,
    /// Author username as shown in search results.
    #[serde(default)]
    pub username: Option<String>,
    /// Channel the message was posted in.
    pub channel: SlackChannel,
    /// Permalink to the message.
    #[serde(default)]
    pub permalink: Option<String>,
}

impl SlackSearchMatch {
    /// Returns the timestamp identifying the thread this hit belongs to.
    pub fn thread_key_ts(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackSearchPage {
    /// Matches on this page.
    pub matches: Vec<SlackSearchMatch>,
    /// Total matches across all pages.
    pub total: u64,
    /// 1-indexed page number.
    pub page: u32,
    /// Number of pages available.
    pub page_count: u32,
}

impl SlackSearchPage {
    /// Returns true if no further page exists.
    pub fn is_last(&self) -> bool {
        self.page >= self.page_count || self.matches.is_empty()
    }
}

/// A message inside a thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    /// Message timestamp.
    pub ts: String,
    /// Parent thread timestamp.
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Author user ID (absent for some bot messages).
    #[serde(default)]
    pub user: Option<String>,
    /// Bot ID for bot-authored messages.
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Message text.
    #[serde(default)]
    pub text: String,
    /// Reply count (parent messages only).
    #[serde(default)]
    pub reply_count: u32,
}

impl SlackMessage {
    /// Returns the message time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_slack_ts(&self.ts)
    }

    /// Returns true if this message starts its thread.
    pub fn is_parent(&self) -> bool {
        self.thread_ts.as_deref().is_none_or(|t| t == self.ts)
    }
}

/// A fully expanded thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackThread {
    /// Channel of the thread.
    pub channel: SlackChannel,
    /// Timestamp of the parent message.
    pub thread_ts: String,
    /// Permalink to the parent message.
    #[serde(default)]
    pub permalink: Option<String>,
    /// Parent followed by replies, in upstream order.
    pub messages: Vec<SlackMessage>,
}

impl SlackThread {
    /// Returns the parent message.
    pub fn parent(&self) -> Option<&SlackMessage> {
        self.messages.first()
    }

    /// Returns the replies (everything after the parent).
    pub fn replies(&self) -> &[SlackMessage] {
        self.messages.get(1..).unwrap_or_default()
    }

    /// Returns distinct author IDs in first-seen order.
    pub fn user_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.messages.iter().filter_map(|m| m.user.as_deref()) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

/// A Slack user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackUser {
    /// User ID.
    pub id: String,
    /// Handle.
    #[serde(default)]
    pub name: String,
    /// Full name.
    #[serde(default)]
    pub real_name: Option<String>,
    /// Display name from the profile.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Whether the user is a bot.
    #[serde(default)]
    pub is_bot: bool,
}

impl SlackUser {
    /// Returns the best name to show for this user.
    pub fn preferred_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.real_name.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(&self.name)
    }
}
