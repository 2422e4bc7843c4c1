//! Field extraction from Slack's untyped response envelopes.
//!
//! Slack reports business failures as `{"ok": false, "error": "<code>"}`,
//! usually inside HTTP 200 responses but sometimes with a 4xx or 429
//! status. Payload shapes vary between endpoints and workspace plans.
//! Everything here reads a `serde_json::Value` field by field, skipping
//! records without an identifier and defaulting the rest.

use gleaner_core::{
    ApiError, SlackChannel, SlackMessage, SlackSearchMatch, SlackSearchPage, SlackUser,
};
use serde_json::Value;
use url::Url;

use super::error::map_slack_error;

// ============================================================================
// Envelope Gate
// ============================================================================

/// Passes the body through when `ok` is true, otherwise maps the vendor code.
///
/// A missing or non-boolean `ok` counts as a failure.
pub(crate) fn check_envelope(body: Value) -> Result<Value, ApiError> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        Ok(body)
    } else {
        Err(map_slack_error(body.get("error").and_then(Value::as_str)))
    }
}

/// Maps an explicit `ok: false` envelope carried by a non-2xx response.
///
/// Other bodies are left to the HTTP status table.
pub(crate) fn envelope_error(body: &Value) -> Option<ApiError> {
    let ok = body.get("ok")?.as_bool()?;
    (!ok).then(|| map_slack_error(body.get("error").and_then(Value::as_str)))
}

// ============================================================================
// Field Helpers
// ============================================================================

fn opt_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string(value: &Value, key: &str) -> String {
    opt_string(value, key).unwrap_or_default()
}

// Slack sometimes encodes counters as strings.
fn number(value: &Value, key: &str) -> u64 {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

fn small_number(value: &Value, key: &str) -> u32 {
    u32::try_from(number(value, key)).unwrap_or(u32::MAX)
}

// ============================================================================
// Payload Parsers
// ============================================================================

/// Reads the `thread_ts` query parameter of a message permalink.
pub(crate) fn thread_ts_from_permalink(permalink: &str) -> Option<String> {
    let url = Url::parse(permalink).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "thread_ts")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

fn parse_channel(value: Option<&Value>) -> Option<SlackChannel> {
    match value? {
        Value::String(id) if !id.is_empty() => Some(SlackChannel {
            id: id.clone(),
            name: None,
        }),
        obj @ Value::Object(_) => Some(SlackChannel {
            id: opt_string(obj, "id")?,
            name: opt_string(obj, "name"),
        }),
        _ => None,
    }
}

/// Parses one `search.messages` hit. Hits without `ts` or channel ID are dropped.
pub(crate) fn parse_search_match(value: &Value) -> Option<SlackSearchMatch> {
    let ts = opt_string(value, "ts")?;
    let channel = parse_channel(value.get("channel"))?;
    let permalink = opt_string(value, "permalink");
    let thread_ts = opt_string(value, "thread_ts")
        .or_else(|| permalink.as_deref().and_then(thread_ts_from_permalink));

    Some(SlackSearchMatch {
        ts,
        thread_ts,
        text: string(value, "text"),
        user: opt_string(value, "user"),
        username: opt_string(value, "username"),
        channel,
        permalink,
    })
}

/// Parses the `messages` block of a `search.messages` response.
///
/// `requested_page` is used when the response carries no paging block.
pub(crate) fn parse_search_page(body: &Value, requested_page: u32) -> SlackSearchPage {
    let Some(messages) = body.get("messages") else {
        return SlackSearchPage {
            page: requested_page,
            page_count: requested_page,
            ..Default::default()
        };
    };

    let matches: Vec<SlackSearchMatch> = messages
        .get("matches")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_search_match).collect())
        .unwrap_or_default();

    let paging = messages.get("paging").unwrap_or(&Value::Null);
    let total = match number(messages, "total") {
        0 => number(paging, "total"),
        n => n,
    };
    let page = match small_number(paging, "page") {
        0 => requested_page,
        n => n,
    };
    let page_count = match small_number(paging, "pages") {
        0 => page,
        n => n,
    };

    SlackSearchPage {
        matches,
        total,
        page,
        page_count,
    }
}

/// Parses one message from `conversations.replies`. Messages without `ts` are dropped.
pub(crate) fn parse_message(value: &Value) -> Option<SlackMessage> {
    Some(SlackMessage {
        ts: opt_string(value, "ts")?,
        thread_ts: opt_string(value, "thread_ts"),
        user: opt_string(value, "user"),
        bot_id: opt_string(value, "bot_id"),
        text: string(value, "text"),
        reply_count: small_number(value, "reply_count"),
    })
}

/// Parses the `messages` array of a `conversations.replies` page.
pub(crate) fn parse_messages(body: &Value) -> Vec<SlackMessage> {
    body.get("messages")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_message).collect())
        .unwrap_or_default()
}

/// Returns the next pagination cursor, if any.
pub(crate) fn next_cursor(body: &Value) -> Option<String> {
    body.get("response_metadata")
        .and_then(|m| opt_string(m, "next_cursor"))
}

/// Parses the `user` object of a `users.info` response.
pub(crate) fn parse_user(body: &Value) -> Option<SlackUser> {
    let user = body.get("user")?;
    let profile = user.get("profile").unwrap_or(&Value::Null);

    Some(SlackUser {
        id: opt_string(user, "id")?,
        name: string(user, "name"),
        real_name: opt_string(user, "real_name").or_else(|| opt_string(profile, "real_name")),
        display_name: opt_string(profile, "display_name"),
        is_bot: user.get("is_bot").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Reads the `permalink` of a `chat.getPermalink` response.
pub(crate) fn parse_permalink(body: &Value) -> Option<String> {
    opt_string(body, "permalink")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_core::ApiErrorKind;
    use serde_json::json;

    #[test]
    fn test_envelope_ok() {
        let body = json!({"ok": true, "permalink": "https://x"});
        assert!(check_envelope(body).is_ok());
    }

    #[test]
    fn test_envelope_failure_maps_code() {
        let err = check_envelope(json!({"ok": false, "error": "invalid_auth"})).unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Unauthorized);
    }

    #[test]
    fn test_envelope_missing_ok_is_failure() {
        let err = check_envelope(json!({"messages": []})).unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::SlackApi);

        let err = check_envelope(json!({"ok": "true"})).unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::SlackApi);
    }

    #[test]
    fn test_envelope_error_on_error_status() {
        let err = envelope_error(&json!({"ok": false, "error": "ratelimited"})).unwrap();
        assert_eq!(err.kind(), ApiErrorKind::RateLimit);

        // Only an explicit `ok: false` overrides the status.
        assert!(envelope_error(&json!({"error": "invalid_auth"})).is_none());
        assert!(envelope_error(&json!({"ok": true})).is_none());
        assert!(envelope_error(&json!("Bad Request")).is_none());
    }

    #[test]
    fn test_search_page() {
        let body = json!({
            "ok": true,
            "messages": {
                "total": 3,
                "matches": [
                    {"ts": "1.1", "text": "hi", "user": "U1", "channel": {"id": "C1", "name": "general"}},
                    {"ts": "1.2", "channel": "C2", "thread_ts": "1.0"},
                    {"text": "no ts", "channel": {"id": "C1"}},
                    {"ts": "1.3"}
                ],
                "paging": {"count": 100, "total": 3, "page": 1, "pages": 2}
            }
        });

        let page = parse_search_page(&body, 1);
        assert_eq!(page.matches.len(), 2);
        assert_eq!(page.total, 3);
        assert_eq!(page.page_count, 2);
        assert!(!page.is_last());
        assert_eq!(page.matches[0].channel.name.as_deref(), Some("general"));
        assert_eq!(page.matches[1].channel.id, "C2");
        assert_eq!(page.matches[1].thread_key_ts(), "1.0");
    }

    #[test]
    fn test_search_page_without_messages_block() {
        let page = parse_search_page(&json!({"ok": true}), 4);
        assert!(page.matches.is_empty());
        assert_eq!(page.page, 4);
        assert!(page.is_last());
    }

    #[test]
    fn test_thread_ts_from_permalink() {
        let hit = parse_search_match(&json!({
            "ts": "1700000005.000200",
            "channel": {"id": "C1"},
            "permalink": "https://acme.slack.com/archives/C1/p1700000005000200?thread_ts=1700000000.000100&cid=C1"
        }))
        .unwrap();

        assert_eq!(hit.thread_ts.as_deref(), Some("1700000000.000100"));
        assert_eq!(thread_ts_from_permalink("not a url"), None);
    }

    #[test]
    fn test_mistyped_fields_default() {
        let msg = parse_message(&json!({"ts": "1.0", "text": 42, "reply_count": "7", "user": null})).unwrap();
        assert_eq!(msg.text, "");
        assert_eq!(msg.reply_count, 7);
        assert_eq!(msg.user, None);
    }

    #[test]
    fn test_messages_and_cursor() {
        let body = json!({
            "ok": true,
            "messages": [{"ts": "1.0"}, {"ts": "1.1", "thread_ts": "1.0"}],
            "response_metadata": {"next_cursor": "bmV4dA=="}
        });
        assert_eq!(parse_messages(&body).len(), 2);
        assert_eq!(next_cursor(&body).as_deref(), Some("bmV4dA=="));

        let last = json!({"ok": true, "messages": [], "response_metadata": {"next_cursor": ""}});
        assert_eq!(next_cursor(&last), None);
    }

    #[test]
    fn test_parse_user() {
        let body = json!({
            "ok": true,
            "user": {
                "id": "U1",
                "name": "taro",
                "is_bot": false,
                "profile": {"real_name": "Taro Yamada", "display_name": "taro-y"}
            }
        });

        let user = parse_user(&body).unwrap();
        assert_eq!(user.real_name.as_deref(), Some("Taro Yamada"));
        assert_eq!(user.preferred_name(), "taro-y");
        assert!(parse_user(&json!({"ok": true, "user": {"name": "x"}})).is_none());
    }
}
