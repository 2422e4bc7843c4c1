//! Docbase post types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A Docbase post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocbasePost {
    /// Post ID.
    pub id: u64,
    /// Post title.
    #[serde(default)]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
    /// Whether the post is still a draft.
    #[serde(default)]
    pub draft: bool,
    /// Web URL of the post.
    #[serde(default)]
    pub url: String,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
    /// Tags attached to the post.
    #[serde(default)]
    pub tags: Vec<DocbaseTag>,
    /// Author.
    #[serde(default)]
    pub user: Option<DocbaseUser>,
    /// Groups the post is shared with.
    #[serde(default)]
    pub groups: Vec<DocbaseGroup>,
    /// Visibility scope ("everyone", "group", "private").
    #[serde(default)]
    pub scope: Option<String>,
}

impl DocbasePost {
    /// Returns the tag names.
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// Returns the author's name, if known.
    pub fn author_name(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.name.as_str())
    }
}

/// A Docbase tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocbaseTag {
    /// Tag name.
    pub name: String,
}

/// A Docbase user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocbaseUser {
    /// User ID.
    pub id: u64,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// A Docbase group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocbaseGroup {
    /// Group ID.
    pub id: u64,
    /// Group name.
    #[serde(default)]
    pub name: String,
}
