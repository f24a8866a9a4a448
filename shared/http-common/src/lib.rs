//! Shared HTTP utilities for the URL shortener workspace.
//!
//! Provides the public error vocabulary and JSON error bodies used by the
//! api-server. Kept framework-agnostic: builders return `serde_json::Value`.

use domain::CoreError;

// ============================================================================
// Public error messages
// ============================================================================

/// Any problem with a submitted URL: missing, malformed, wrong scheme, or
/// unresolvable host. The distinction is deliberately not exposed.
pub const INVALID_URL: &str = "invalid url";
/// Short id path segment is not a positive integer.
pub const INVALID_SHORT_URL: &str = "invalid short url";
/// Short id is well-formed but unassigned.
pub const SHORT_URL_NOT_FOUND: &str = "short url not found";
pub const INTERNAL_ERROR: &str = "internal error";

/// Map a domain error to the message callers see.
pub fn public_error(err: &CoreError) -> &'static str {
    match err {
        CoreError::MalformedUrl(_)
        | CoreError::UnsupportedScheme(_)
        | CoreError::UnresolvableHost(_) => INVALID_URL,
        CoreError::InvalidIdentifier(_) => INVALID_SHORT_URL,
        CoreError::NotFound => SHORT_URL_NOT_FOUND,
        CoreError::Repository(_) => INTERNAL_ERROR,
    }
}

// ============================================================================
// JSON Response Helpers
// ============================================================================

/// Returns: `{"error": "<message>"}`
pub fn json_err(message: &str) -> serde_json::Value {
    serde_json::json!({ "error": message })
}

/// Error body for a domain error, using [`public_error`].
pub fn json_core_err(err: &CoreError) -> serde_json::Value {
    json_err(public_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_err() {
        assert_eq!(
            json_err("invalid url"),
            serde_json::json!({"error": "invalid url"})
        );
    }

    #[test]
    fn test_validation_errors_collapse() {
        for err in [
            CoreError::MalformedUrl("x".into()),
            CoreError::UnsupportedScheme("ftp".into()),
            CoreError::UnresolvableHost("nowhere".into()),
        ] {
            assert_eq!(public_error(&err), INVALID_URL);
        }
    }

    #[test]
    fn test_lookup_errors() {
        assert_eq!(
            json_core_err(&CoreError::InvalidIdentifier("abc".into())),
            serde_json::json!({"error": "invalid short url"})
        );
        assert_eq!(
            json_core_err(&CoreError::NotFound),
            serde_json::json!({"error": "short url not found"})
        );
        assert_eq!(
            public_error(&CoreError::Repository("poisoned".into())),
            INTERNAL_ERROR
        );
    }
}
