//! # Identifier and Value Sanitization
//!
//! Identifiers cannot be supplied as bound parameters, so every table and
//! column name is reduced to `[A-Za-z0-9_]` before it reaches SQL text.

use crate::database::SqlValue;

/// Strip every character outside `[A-Za-z0-9_]` from an identifier.
///
/// Total and idempotent; the worst case is an empty string, which is passed
/// through rather than rejected (a malformed statement then surfaces as an
/// engine error). This character-class filter is the sole injection defense
/// for identifier positions.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Double single quotes in text values for direct interpolation.
///
/// Defense-in-depth only: the REST path binds every value as a parameter and
/// never interpolates, so this is a safety net for raw-interpolation uses.
/// Non-text values pass through unchanged.
pub fn coerce_for_raw_interpolation(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(s) => SqlValue::Text(s.replace('\'', "''")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_disallowed_chars() {
        assert_eq!(sanitize_identifier("users"), "users");
        assert_eq!(sanitize_identifier("user_name2"), "user_name2");
        assert_eq!(sanitize_identifier("users; DROP TABLE x--"), "usersDROPTABLEx");
        assert_eq!(sanitize_identifier("`users`"), "users");
        assert_eq!(sanitize_identifier("a.b"), "ab");
    }

    #[test]
    fn test_sanitize_is_total() {
        assert_eq!(sanitize_identifier(""), "");
        assert_eq!(sanitize_identifier("';--"), "");
        assert_eq!(sanitize_identifier("日本語"), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for input in ["users", "a b c", "'; DROP", "", "x_1"] {
            let once = sanitize_identifier(input);
            assert_eq!(sanitize_identifier(&once), once);
        }
    }

    #[test]
    fn test_coerce_doubles_single_quotes() {
        let coerced = coerce_for_raw_interpolation(SqlValue::Text("O'Brien".to_string()));
        assert_eq!(coerced, SqlValue::Text("O''Brien".to_string()));
    }

    #[test]
    fn test_coerce_passes_non_text_through() {
        assert_eq!(
            coerce_for_raw_interpolation(SqlValue::Integer(42)),
            SqlValue::Integer(42)
        );
        assert_eq!(coerce_for_raw_interpolation(SqlValue::Null), SqlValue::Null);
    }
}
