//! URL construction and input checks shared by the adapters.

use gleaner_core::ApiError;
use gleaner_fetch::RequestOptions;
use url::Url;

/// Joins `base` and `path` and appends form-encoded query parameters.
pub(crate) fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<String, ApiError> {
    let raw = format!("{}{}", base.trim_end_matches('/'), path);
    let mut url = Url::parse(&raw)
        .map_err(|e| ApiError::validation(format!("Invalid URL {raw}: {e}")).with_cause(e))?;

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url.into())
}

/// Returns the trimmed value, or a validation error if it is blank.
pub(crate) fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Like [`require`], but also rejects characters that would escape a path segment.
pub(crate) fn require_segment<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = require(field, value)?;
    let valid = trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid || trimmed == "." || trimmed == ".." {
        return Err(ApiError::validation(format!("{field} contains invalid characters: {trimmed}")));
    }
    Ok(trimmed)
}

/// Adds a bearer header when a non-blank token is given.
pub(crate) fn optional_bearer(options: RequestOptions, token: Option<&str>) -> RequestOptions {
    match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => options.bearer(token),
        None => options,
    }
}
