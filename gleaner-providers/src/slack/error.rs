//! Slack vendor error codes.

use gleaner_core::ApiError;

/// Code reported when an envelope has `ok: false` but no `error` field.
pub const UNKNOWN_ERROR_CODE: &str = "unknown_error";

/// Maps a Slack `error` code to an [`ApiError`].
///
/// Total: unrecognized codes become [`ApiError::SlackApi`] carrying the raw code.
pub fn map_slack_error(code: Option<&str>) -> ApiError {
    let code = code.map(str::trim).filter(|c| !c.is_empty()).unwrap_or(UNKNOWN_ERROR_CODE);

    match code {
        "invalid_auth" | "not_authed" | "token_revoked" | "account_inactive" => {
            ApiError::unauthorized(format!("Slack rejected the token ({code})"))
        }
        "missing_scope" => ApiError::missing_scope(format!("Slack token lacks a required scope ({code})")),
        "channel_not_found" | "thread_not_found" | "message_not_found" | "user_not_found" => {
            ApiError::not_found(format!("Slack resource not found ({code})"))
        }
        "ratelimited" | "rate_limited" => ApiError::rate_limit(format!("Slack rate limit hit ({code})")),
        other => ApiError::slack_api(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_core::ApiErrorKind;

    #[test]
    fn test_code_table() {
        let cases = [
            ("invalid_auth", ApiErrorKind::Unauthorized),
            ("not_authed", ApiErrorKind::Unauthorized),
            ("token_revoked", ApiErrorKind::Unauthorized),
            ("account_inactive", ApiErrorKind::Unauthorized),
            ("missing_scope", ApiErrorKind::MissingScope),
            ("channel_not_found", ApiErrorKind::NotFound),
            ("thread_not_found", ApiErrorKind::NotFound),
            ("message_not_found", ApiErrorKind::NotFound),
            ("user_not_found", ApiErrorKind::NotFound),
            ("ratelimited", ApiErrorKind::RateLimit),
            ("rate_limited", ApiErrorKind::RateLimit),
        ];

        for (code, kind) in cases {
            assert_eq!(map_slack_error(Some(code)).kind(), kind, "code {code}");
        }
    }

    #[test]
    fn test_unknown_code_passes_through() {
        let err = map_slack_error(Some("is_archived"));
        assert_eq!(err.kind(), ApiErrorKind::SlackApi);
        assert_eq!(err.message(), "is_archived");
    }

    #[test]
    fn test_missing_code() {
        let err = map_slack_error(None);
        assert_eq!(err.kind(), ApiErrorKind::SlackApi);
        assert_eq!(err.message(), UNKNOWN_ERROR_CODE);

        assert_eq!(map_slack_error(Some("  ")).message(), UNKNOWN_ERROR_CODE);
    }
}
