//! Input validation applied before any request is built.

use crate::error::{Error, Result};

/// Largest page size the API accepts.
pub const MAX_PAGE_LIMIT: i64 = 500;

/// Validate a caller-supplied identifier destined for a URL path segment.
///
/// Rejects empty values and anything containing a path separator or a
/// parent-directory sequence, anywhere in the string. A rejected value
/// never reaches the network.
pub fn sanitize_path_param(value: &str) -> Result<&str> {
    if value.is_empty() || value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(Error::Validation(format!(
            "invalid path parameter: {value:?}"
        )));
    }
    Ok(value)
}

/// Clamp a page size into the API's accepted range of 1..=500.
pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(1, MAX_PAGE_LIMIT)
}

/// Clamp a pagination offset to be non-negative.
pub fn clamp_offset(offset: i64) -> i64 {
    offset.max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_identifiers_pass_through_unchanged() {
        for id in ["h1", "bounty-42", "conv_9f3", "A.B", "0042"] {
            assert_eq!(sanitize_path_param(id).ok(), Some(id));
        }
    }

    #[test]
    fn separators_and_traversal_are_rejected_anywhere() {
        for id in [
            "",
            "../admin",
            "a/../b",
            "humans/1",
            "a\\b",
            "x..",
            "..",
            "trailing/",
            "mid..dle",
        ] {
            assert!(
                matches!(sanitize_path_param(id), Err(Error::Validation(_))),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn limit_clamps_into_range() {
        assert_eq!(clamp_limit(-3), 1);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(1), 1);
        assert_eq!(clamp_limit(20), 20);
        assert_eq!(clamp_limit(500), 500);
        assert_eq!(clamp_limit(501), 500);
        assert_eq!(clamp_limit(i64::MAX), 500);
    }

    #[test]
    fn offset_clamps_to_non_negative() {
        assert_eq!(clamp_offset(i64::MIN), 0);
        assert_eq!(clamp_offset(-1), 0);
        assert_eq!(clamp_offset(0), 0);
        assert_eq!(clamp_offset(7), 7);
    }
}
