//! HTTP status to error kind mapping.
//!
//! Shared by the real and mock clients so both classify failures
//! identically.

use gleaner_core::{ApiError, ApiErrorKind};
use reqwest::StatusCode;

/// Maximum number of body characters kept in an error message.
const MAX_DETAIL_CHARS: usize = 200;

/// Maps a non-success HTTP status to an error kind.
///
/// Unlisted statuses (including every 5xx) are treated as network failures.
pub fn kind_for_status(status: u16) -> ApiErrorKind {
    match status {
        400 => ApiErrorKind::Validation,
        401 => ApiErrorKind::Unauthorized,
        403 => ApiErrorKind::MissingScope,
        404 => ApiErrorKind::NotFound,
        429 => ApiErrorKind::RateLimit,
        _ => ApiErrorKind::Network,
    }
}

/// Builds the error for a non-success HTTP status.
///
/// `detail` is typically the response body; it is trimmed and truncated.
pub fn error_for_status(status: u16, detail: &str) -> ApiError {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unexpected status");

    let detail = excerpt(detail);
    let message = if detail.is_empty() {
        format!("HTTP {status} {reason}")
    } else {
        format!("HTTP {status} {reason}: {detail}")
    };

    ApiError::from_kind(kind_for_status(status), message)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_DETAIL_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_DETAIL_CHARS).collect();
    cut.push('…');
    cut
}
