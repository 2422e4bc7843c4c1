//! Shared error taxonomy for every service adapter.
//!
//! Every failing call in Gleaner ends in exactly one [`ApiError`] variant.
//! Adapters never invent their own error types for upstream failures; they
//! translate HTTP statuses and vendor error codes into this closed set so
//! callers can branch on [`ApiErrorKind`] alone.

use std::fmt;
use std::sync::Arc;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Opaque original error attached to an [`ApiError`].
pub type ErrorCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// Error Kind
// ============================================================================

/// Fieldless tag identifying an [`ApiError`] variant.
///
/// Used wherever a set of error kinds is needed, e.g. the retryable set of
/// a retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Transport failure, malformed body, or unmapped HTTP status.
    Network,
    /// Credential rejected (HTTP 401, Slack `invalid_auth`, ...).
    Unauthorized,
    /// Credential lacks a required permission (HTTP 403).
    MissingScope,
    /// Requested resource does not exist (HTTP 404).
    NotFound,
    /// Upstream rate limit hit (HTTP 429).
    RateLimit,
    /// Bad input, usually detected before any network call.
    Validation,
    /// Slack vendor error code with no dedicated mapping.
    SlackApi,
    /// Anything else.
    Unknown,
}

impl ApiErrorKind {
    /// Returns the wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Unauthorized => "unauthorized",
            Self::MissingScope => "missing_scope",
            Self::NotFound => "not_found",
            Self::RateLimit => "rate_limit",
            Self::Validation => "validation",
            Self::SlackApi => "slack_api",
            Self::Unknown => "unknown",
        }
    }

    /// Returns all error kinds.
    pub fn all() -> &'static [ApiErrorKind] {
        &[
            Self::Network,
            Self::Unauthorized,
            Self::MissingScope,
            Self::NotFound,
            Self::RateLimit,
            Self::Validation,
            Self::SlackApi,
            Self::Unknown,
        ]
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// API Error
// ============================================================================

/// Error returned by every request client and adapter operation.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Transport failure, malformed body, or unmapped HTTP status.
    #[error("Network error: {message}")]
    Network {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Credential rejected.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Credential lacks a required scope.
    #[error("Missing scope: {message}")]
    MissingScope {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Resource not found.
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Rate limited by the upstream service.
    #[error("Rate limited: {message}")]
    RateLimit {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Invalid input.
    #[error("Validation failed: {message}")]
    Validation {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Unmapped Slack vendor error code.
    #[error("Slack API error: {message}")]
    SlackApi {
        /// Human-readable description, including the raw vendor code.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },

    /// Unclassified failure.
    #[error("Unknown error: {message}")]
    Unknown {
        /// Human-readable description.
        message: String,
        /// Original error, if any.
        #[source]
        cause: Option<ErrorCause>,
    },
}

impl ApiError {
    /// Creates an error of the given kind with no cause.
    pub fn from_kind(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let cause = None;
        match kind {
            ApiErrorKind::Network => Self::Network { message, cause },
            ApiErrorKind::Unauthorized => Self::Unauthorized { message, cause },
            ApiErrorKind::MissingScope => Self::MissingScope { message, cause },
            ApiErrorKind::NotFound => Self::NotFound { message, cause },
            ApiErrorKind::RateLimit => Self::RateLimit { message, cause },
            ApiErrorKind::Validation => Self::Validation { message, cause },
            ApiErrorKind::SlackApi => Self::SlackApi { message, cause },
            ApiErrorKind::Unknown => Self::Unknown { message, cause },
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::Network, message)
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::Unauthorized, message)
    }

    /// Creates a missing-scope error.
    pub fn missing_scope(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::MissingScope, message)
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::NotFound, message)
    }

    /// Creates a rate-limit error.
    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::RateLimit, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::Validation, message)
    }

    /// Creates a Slack passthrough error.
    pub fn slack_api(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::SlackApi, message)
    }

    /// Creates an unknown error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::from_kind(ApiErrorKind::Unknown, message)
    }

    /// Attaches the original error as the cause.
    #[must_use]
    pub fn with_cause<E>(mut self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        *self.cause_slot() = Some(Arc::new(err));
        self
    }

    /// Returns the tag of this error.
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Network { .. } => ApiErrorKind::Network,
            Self::Unauthorized { .. } => ApiErrorKind::Unauthorized,
            Self::MissingScope { .. } => ApiErrorKind::MissingScope,
            Self::NotFound { .. } => ApiErrorKind::NotFound,
            Self::RateLimit { .. } => ApiErrorKind::RateLimit,
            Self::Validation { .. } => ApiErrorKind::Validation,
            Self::SlackApi { .. } => ApiErrorKind::SlackApi,
            Self::Unknown { .. } => ApiErrorKind::Unknown,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::MissingScope { message, .. }
            | Self::NotFound { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Validation { message, .. }
            | Self::SlackApi { message, .. }
            | Self::Unknown { message, .. } => message,
        }
    }

    /// Returns the original error, if one was attached.
    pub fn cause(&self) -> Option<&ErrorCause> {
        match self {
            Self::Network { cause, .. }
            | Self::Unauthorized { cause, .. }
            | Self::MissingScope { cause, .. }
            | Self::NotFound { cause, .. }
            | Self::RateLimit { cause, .. }
            | Self::Validation { cause, .. }
            | Self::SlackApi { cause, .. }
            | Self::Unknown { cause, .. } => cause.as_ref(),
        }
    }

    fn cause_slot(&mut self) -> &mut Option<ErrorCause> {
        match self {
            Self::Network { cause, .. }
            | Self::Unauthorized { cause, .. }
            | Self::MissingScope { cause, .. }
            | Self::NotFound { cause, .. }
            | Self::RateLimit { cause, .. }
            | Self::Validation { cause, .. }
            | Self::SlackApi { cause, .. }
            | Self::Unknown { cause, .. } => cause,
        }
    }

    /// Returns true if the credential must be replaced before retrying.
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ApiErrorKind::Unauthorized
    }

    /// Returns true if the error was raised locally, without a network call.
    pub fn is_local(&self) -> bool {
        self.kind() == ApiErrorKind::Validation
    }
}

impl Serialize for ApiError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiError", 2)?;
        state.serialize_field("type", &self.kind())?;
        state.serialize_field("message", self.message())?;
        state.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_from_kind_matches_kind() {
        for kind in ApiErrorKind::all() {
            let err = ApiError::from_kind(*kind, "boom");
            assert_eq!(err.kind(), *kind);
            assert_eq!(err.message(), "boom");
            assert!(err.cause().is_none());
        }
    }

    #[test]
    fn test_with_cause_sets_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::network("connect failed").with_cause(io);

        assert!(err.cause().is_some());
        assert_eq!(err.source().map(ToString::to_string), Some("refused".to_string()));
    }

    #[test]
    fn test_clone_shares_cause() {
        let io = std::io::Error::other("disk");
        let err = ApiError::unknown("x").with_cause(io);
        let cloned = err.clone();

        assert!(Arc::ptr_eq(
            err.cause().unwrap(),
            cloned.cause().unwrap()
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ApiError::unauthorized("token revoked").to_string(),
            "Unauthorized: token revoked"
        );
        assert_eq!(
            ApiError::slack_api("channel_is_archived").to_string(),
            "Slack API error: channel_is_archived"
        );
    }

    #[test]
    fn test_kind_serde_tags() {
        assert_eq!(
            serde_json::to_string(&ApiErrorKind::NotFound).unwrap(),
            r#""not_found""#
        );
        let kind: ApiErrorKind = serde_json::from_str(r#""rate_limit""#).unwrap();
        assert_eq!(kind, ApiErrorKind::RateLimit);
        assert_eq!(ApiErrorKind::MissingScope.to_string(), "missing_scope");
    }

    #[test]
    fn test_error_serializes_type_and_message() {
        let json = serde_json::to_value(ApiError::validation("query is required")).unwrap();
        assert_eq!(json["type"], "validation");
        assert_eq!(json["message"], "query is required");
    }

    #[test]
    fn test_classification_helpers() {
        assert!(ApiError::unauthorized("x").is_auth_failure());
        assert!(!ApiError::missing_scope("x").is_auth_failure());
        assert!(ApiError::validation("x").is_local());
        assert!(!ApiError::network("x").is_local());
    }
}
