//! Zenn article types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Base URL for article web links.
const ZENN_WEB_BASE: &str = "https://zenn.dev";

/// A Zenn article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZennArticle {
    /// Article ID.
    pub id: u64,
    /// URL slug.
    pub slug: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Emoji shown next to the title.
    #[serde(default)]
    pub emoji: Option<String>,
    /// "tech" or "idea".
    #[serde(default)]
    pub article_type: Option<String>,
    /// Publication time.
    #[serde(default)]
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Like count.
    #[serde(default)]
    pub liked_count: u64,
    /// Site-relative path (`/user/articles/slug`).
    #[serde(default)]
    pub path: String,
    /// Author.
    #[serde(default)]
    pub user: Option<ZennUser>,
    /// Rendered HTML body (only on single-article lookups).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
}

impl ZennArticle {
    /// Returns the absolute web URL.
    pub fn url(&self) -> String {
        format!("{ZENN_WEB_BASE}{}", self.path)
    }
}

/// A Zenn user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZennUser {
    /// Username.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_article_with_millis_offset() {
        let json = r#"{
            "id": 10,
            "slug": "rust-retry",
            "title": "Retry in Rust",
            "emoji": "🦀",
            "article_type": "tech",
            "published_at": "2024-03-01T09:30:00.000+09:00",
            "liked_count": 12,
            "path": "/alice/articles/rust-retry",
            "user": {"username": "alice", "name": "Alice"}
        }"#;

        let article: ZennArticle = serde_json::from_str(json).unwrap();
        assert_eq!(article.url(), "https://zenn.dev/alice/articles/rust-retry");
        assert!(article.published_at.is_some());
        assert!(article.body_html.is_none());
    }
}
