//! Best-effort Slack thread collection.
//!
//! Runs a paged message search, groups the hits into threads, expands each
//! thread and resolves every author once. Unlike the single-call adapters,
//! a failing sub-call here is recorded and skipped; only a search that
//! yields nothing at all fails the whole collection.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use gleaner_core::{ApiError, SlackChannel, SlackSearchMatch, SlackThread, SlackUser};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::api::SlackClient;
use crate::endpoint::require;

/// Largest page size `search.messages` accepts.
const MAX_SEARCH_PAGE_SIZE: u32 = 100;

// ============================================================================
// Types
// ============================================================================

/// Limits for one collection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    /// Global ceiling on search matches considered.
    pub max_messages: usize,
    /// Matches requested per search page (clamped to 1..=100).
    pub page_size: u32,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_messages: 300,
            page_size: 100,
        }
    }
}

/// Phase in which a sub-call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionStage {
    /// A search page after the first.
    Search,
    /// Thread expansion.
    Thread,
    /// User profile lookup.
    User,
    /// Permalink lookup.
    Permalink,
}

impl fmt::Display for CollectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Search => "search",
            Self::Thread => "thread",
            Self::User => "user",
            Self::Permalink => "permalink",
        };
        f.write_str(name)
    }
}

/// A sub-call that failed without aborting the collection.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionFailure {
    /// Phase of the failed call.
    pub stage: CollectionStage,
    /// What was being fetched (`page 2`, `C1/1700000000.000100`, `U123`).
    pub target: String,
    /// The error returned.
    pub error: ApiError,
}

impl CollectionFailure {
    fn new(stage: CollectionStage, target: impl Into<String>, error: ApiError) -> Self {
        Self {
            stage,
            target: target.into(),
            error,
        }
    }
}

/// Result of a collection run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThreadCollection {
    /// Expanded threads in first-seen order.
    pub threads: Vec<SlackThread>,
    /// Resolved authors keyed by user ID, ordered by ID.
    pub users: BTreeMap<String, SlackUser>,
    /// Sub-calls that failed.
    pub failures: Vec<CollectionFailure>,
    /// Search matches considered after applying the ceiling.
    pub matched: usize,
}

impl ThreadCollection {
    /// Returns true if no sub-call failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the display name for a user ID, if the profile was resolved.
    pub fn user_name(&self, user_id: &str) -> Option<&str> {
        self.users.get(user_id).map(SlackUser::preferred_name)
    }
}

/// A thread to expand, taken from its first search hit.
#[derive(Debug)]
struct ThreadRef {
    channel: SlackChannel,
    thread_ts: String,
    permalink: Option<String>,
}

impl ThreadRef {
    fn label(&self) -> String {
        format!("{}/{}", self.channel.id, self.thread_ts)
    }
}

/// Groups hits by `(channel, thread_ts or ts)`, keeping first-seen order.
fn group_threads(matches: &[SlackSearchMatch]) -> Vec<ThreadRef> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut threads = Vec::new();

    for hit in matches {
        let key_ts = hit.thread_key_ts();
        if seen.insert((hit.channel.id.as_str(), key_ts)) {
            threads.push(ThreadRef {
                channel: hit.channel.clone(),
                thread_ts: key_ts.to_string(),
                permalink: hit.permalink.clone(),
            });
        }
    }

    threads
}

// ============================================================================
// Collector
// ============================================================================

/// Collects Slack threads matching a search query.
#[derive(Debug, Clone)]
pub struct SlackThreadCollector {
    slack: SlackClient,
}

impl SlackThreadCollector {
    /// Creates a collector over a Slack adapter.
    pub fn new(slack: SlackClient) -> Self {
        Self { slack }
    }

    /// Searches, groups and expands threads, sequentially.
    ///
    /// Returns `Err` only when the query is invalid or the first search page
    /// fails. Every later failure lands in [`ThreadCollection::failures`].
    #[instrument(skip(self, token))]
    pub async fn collect(
        &self,
        token: &str,
        query: &str,
        options: CollectOptions,
    ) -> Result<ThreadCollection, ApiError> {
        let token = require("token", token)?;
        let query = require("query", query)?;

        let mut collection = ThreadCollection::default();
        let matches = self.search(token, query, options, &mut collection.failures).await?;
        collection.matched = matches.len();

        let refs = group_threads(&matches);
        debug!(matches = matches.len(), threads = refs.len(), "Grouped search hits");

        for thread_ref in refs {
            if let Some(thread) = self.expand(token, thread_ref, &mut collection.failures).await {
                collection.threads.push(thread);
            }
        }

        self.resolve_users(token, &mut collection).await;

        if !collection.is_complete() {
            warn!(failures = collection.failures.len(), "Collection finished with failures");
        }
        info!(
            threads = collection.threads.len(),
            users = collection.users.len(),
            "Slack collection complete"
        );
        Ok(collection)
    }

    /// Pages through search results until the ceiling or the last page.
    async fn search(
        &self,
        token: &str,
        query: &str,
        options: CollectOptions,
        failures: &mut Vec<CollectionFailure>,
    ) -> Result<Vec<SlackSearchMatch>, ApiError> {
        let page_size = options.page_size.clamp(1, MAX_SEARCH_PAGE_SIZE);
        let mut matches = Vec::new();
        let mut page = 1;

        while matches.len() < options.max_messages {
            match self.slack.search_messages(token, query, page_size, page).await {
                Ok(result) => {
                    let last = result.is_last();
                    matches.extend(result.matches);
                    if last {
                        break;
                    }
                    page += 1;
                }
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    warn!(page, error = %e, "Search page failed, keeping earlier pages");
                    failures.push(CollectionFailure::new(CollectionStage::Search, format!("page {page}"), e));
                    break;
                }
            }
        }

        matches.truncate(options.max_messages);
        Ok(matches)
    }

    /// Fetches a thread's messages and, when the hit had none, its permalink.
    async fn expand(
        &self,
        token: &str,
        thread_ref: ThreadRef,
        failures: &mut Vec<CollectionFailure>,
    ) -> Option<SlackThread> {
        let label = thread_ref.label();
        let ThreadRef {
            channel,
            thread_ts,
            mut permalink,
        } = thread_ref;

        let messages = match self.slack.get_thread_messages(token, &channel.id, &thread_ts).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!(thread = %label, error = %e, "Skipping thread");
                failures.push(CollectionFailure::new(CollectionStage::Thread, label, e));
                return None;
            }
        };

        if permalink.is_none() {
            match self.slack.get_permalink(token, &channel.id, &thread_ts).await {
                Ok(link) => permalink = Some(link),
                Err(e) => {
                    debug!(thread = %label, error = %e, "No permalink");
                    failures.push(CollectionFailure::new(CollectionStage::Permalink, label, e));
                }
            }
        }

        Some(SlackThread {
            channel,
            thread_ts,
            permalink,
            messages,
        })
    }

    /// Looks up each distinct author at most once, failures included.
    async fn resolve_users(&self, token: &str, collection: &mut ThreadCollection) {
        let mut attempted: HashMap<String, bool> = HashMap::new();
        let ids: Vec<String> = collection
            .threads
            .iter()
            .flat_map(SlackThread::user_ids)
            .map(str::to_string)
            .collect();

        for id in ids {
            if attempted.contains_key(&id) {
                continue;
            }
            match self.slack.get_user_info(token, &id).await {
                Ok(user) => {
                    collection.users.insert(id.clone(), user);
                    attempted.insert(id, true);
                }
                Err(e) => {
                    warn!(user = %id, error = %e, "User lookup failed");
                    collection
                        .failures
                        .push(CollectionFailure::new(CollectionStage::User, id.clone(), e));
                    attempted.insert(id, false);
                }
            }
        }

        debug!(
            attempted = attempted.len(),
            resolved = attempted.values().filter(|ok| **ok).count(),
            "Resolved users"
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
