//! Docbase search query construction.
//!
//! Docbase ANDs space-separated terms, so every filter becomes one more
//! term appended after the quoted keyword.

use chrono::NaiveDate;
use gleaner_core::ApiError;
use serde::{Deserialize, Serialize};

/// Optional filters narrowing a Docbase search.
///
/// Blank or whitespace-only fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedFilters {
    /// Comma-separated tag names.
    pub tags: String,
    /// Author name.
    pub author: String,
    /// Title substring.
    pub title: String,
    /// Inclusive lower bound on creation date (`YYYY-MM-DD`).
    pub start_date: String,
    /// Inclusive upper bound on creation date (`YYYY-MM-DD`).
    pub end_date: String,
    /// Group name.
    pub group: String,
}

impl AdvancedFilters {
    /// Returns true if no filter is set.
    pub fn is_empty(&self) -> bool {
        [
            &self.tags,
            &self.author,
            &self.title,
            &self.start_date,
            &self.end_date,
            &self.group,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }

    /// Checks that the date bounds parse as calendar dates.
    pub fn validate(&self) -> Result<(), ApiError> {
        for (field, value) in [("start_date", &self.start_date), ("end_date", &self.end_date)] {
            let value = value.trim();
            if !value.is_empty() && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                return Err(ApiError::validation(format!(
                    "{field} must be a YYYY-MM-DD date, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Parsed tag list from a comma-separated string.
fn split_tags(tags: &str) -> impl Iterator<Item = &str> {
    tags.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Builds the Docbase `q` parameter.
pub fn build_query(keyword: &str, filters: &AdvancedFilters) -> String {
    let mut terms: Vec<String> = Vec::new();

    let keyword = keyword.trim();
    if !keyword.is_empty() {
        terms.push(format!("\"{keyword}\""));
    }

    terms.extend(split_tags(&filters.tags).map(|tag| format!("tag:{tag}")));

    let author = filters.author.trim();
    if !author.is_empty() {
        terms.push(format!("author:{author}"));
    }

    let title = filters.title.trim();
    if !title.is_empty() {
        terms.push(format!("title:{title}"));
    }

    match (filters.start_date.trim(), filters.end_date.trim()) {
        ("", "") => {}
        (start, "") => terms.push(format!("created_at:{start}~*")),
        ("", end) => terms.push(format!("created_at:*~{end}")),
        (start, end) => terms.push(format!("created_at:{start}~{end}")),
    }

    let group = filters.group.trim();
    if !group.is_empty() {
        terms.push(format!("group:{group}"));
    }

    terms.join(" ")
}
