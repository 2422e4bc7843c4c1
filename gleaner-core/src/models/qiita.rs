//! Qiita item types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A Qiita article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QiitaItem {
    /// Item ID (hex string).
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
    /// Web URL.
    #[serde(default)]
    pub url: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<QiitaTag>,
    /// Author.
    #[serde(default)]
    pub user: Option<QiitaUser>,
    /// Like count.
    #[serde(default)]
    pub likes_count: u64,
    /// Whether the item is limited-sharing.
    #[serde(default)]
    pub private: bool,
}

/// A Qiita tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiitaTag {
    /// Tag name.
    pub name: String,
    /// Versions attached to the tag.
    #[serde(default)]
    pub versions: Vec<String>,
}

/// A Qiita user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QiitaUser {
    /// User ID (login).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}
