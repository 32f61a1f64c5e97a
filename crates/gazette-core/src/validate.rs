//! Per-field validation.
//!
//! A [`FieldSpec`] describes the constraints for one named request field:
//! presence, string coercion, character-length bounds, and a printable
//! character check. Validation is a pure function over a raw JSON value;
//! it knows nothing about sessions, requests, or responses.
//!
//! # Example
//!
//! ```rust
//! use gazette_core::FieldSpec;
//! use serde_json::json;
//!
//! let spec = FieldSpec::new("title");
//!
//! let value = spec.validate(Some(&json!("Hello"))).unwrap();
//! assert_eq!(value.as_deref(), Some("Hello"));
//!
//! let err = spec.validate(None).unwrap_err();
//! assert_eq!(err.error_code(), "invalid_title");
//! ```

use serde_json::Value;
use std::fmt;

/// Default minimum field length in characters.
pub const DEFAULT_MIN_LEN: usize = 1;

/// Default maximum field length in characters.
pub const DEFAULT_MAX_LEN: usize = 4096;

/// Maximum length for article content (1 MiB).
pub const MAX_CONTENT_LEN: usize = 1024 * 1024;

/// Constraints for a single named request field.
///
/// Built with [`FieldSpec::new`] and adjusted through the builder methods.
/// Defaults: required, length 1..=4096 characters, printable characters
/// only.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    name: &'static str,
    min_len: usize,
    max_len: usize,
    required: bool,
    printable: bool,
}

impl FieldSpec {
    /// Creates a spec with the default constraints.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            min_len: DEFAULT_MIN_LEN,
            max_len: DEFAULT_MAX_LEN,
            required: true,
            printable: true,
        }
    }

    /// Sets the minimum length in characters.
    #[must_use]
    pub fn min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    /// Sets the maximum length in characters.
    #[must_use]
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Marks the field as optional: absence validates to `None`.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Disables the printable-character check.
    #[must_use]
    pub fn any_chars(mut self) -> Self {
        self.printable = false;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Validates a raw JSON value against this spec.
    ///
    /// Rules are applied in order and the first failure wins:
    ///
    /// 1. Absent, null, or empty-string values count as missing; missing +
    ///    required fails, missing + optional succeeds with `None`.
    /// 2. Scalars coerce to their string form; arrays and objects fail the
    ///    type check.
    /// 3. Character count below `min_len` or above `max_len` fails.
    /// 4. With the printable check on, any character outside the printable
    ///    set (ASCII graphic, space, `\t` `\n` `\r` `\x0b` `\x0c`) fails.
    ///
    /// # Errors
    ///
    /// Returns a [`FieldError`] carrying the human-readable message and the
    /// `invalid_<name>` code.
    pub fn validate(&self, raw: Option<&Value>) -> Result<Option<String>, FieldError> {
        let present = match raw {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(value) => Some(value),
        };

        let Some(value) = present else {
            if self.required {
                return Err(FieldError::missing(self.name));
            }
            return Ok(None);
        };

        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(_) | Value::Object(_) | Value::Null => {
                return Err(FieldError::wrong_type(self.name));
            }
        };

        let len = text.chars().count();
        if len < self.min_len {
            return Err(FieldError::too_short(self.name, self.min_len));
        }
        if len > self.max_len {
            return Err(FieldError::too_long(self.name, self.max_len));
        }

        if self.printable && !text.chars().all(is_printable) {
            return Err(FieldError::not_printable(self.name));
        }

        Ok(Some(text))
    }
}

/// Whether a character belongs to the printable set accepted in field
/// values: ASCII graphic characters, space, and common whitespace.
fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

/// The way a field value failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required value was absent or empty.
    Missing,
    /// Value could not be coerced to a string.
    WrongType,
    /// Value was shorter than the minimum length.
    TooShort,
    /// Value was longer than the maximum length.
    TooLong,
    /// Value contained a character outside the printable set.
    NotPrintable,
}

/// A validation failure for one named field.
///
/// Carries the human-readable message and maps to the `invalid_<field>`
/// error code used in JSON error payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: String,
    kind: FieldErrorKind,
    text: String,
}

impl FieldError {
    fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::Missing,
            text: format!("Please specify a value for '{field}'!"),
        }
    }

    fn wrong_type(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::WrongType,
            text: format!("Value for '{field}' must be type string!"),
        }
    }

    fn too_short(field: &str, min_len: usize) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::TooShort,
            text: format!("Value for '{field}' must be at least {min_len} characters!"),
        }
    }

    fn too_long(field: &str, max_len: usize) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::TooLong,
            text: format!("Value for '{field}' must be at most {max_len} characters!"),
        }
    }

    fn not_printable(field: &str) -> Self {
        Self {
            field: field.to_string(),
            kind: FieldErrorKind::NotPrintable,
            text: format!("Value for '{field}' uses invalid characters!"),
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the failure kind.
    #[must_use]
    pub fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// Returns the machine error code, `invalid_<field>`.
    #[must_use]
    pub fn error_code(&self) -> String {
        format!("invalid_{}", self.field)
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl std::error::Error for FieldError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_string_passes_through() {
        let spec = FieldSpec::new("title");
        let value = spec.validate(Some(&json!("A Day at the Zoo"))).unwrap();
        assert_eq!(value.as_deref(), Some("A Day at the Zoo"));
    }

    #[test]
    fn test_missing_required() {
        let spec = FieldSpec::new("title");

        let err = spec.validate(None).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::Missing);
        assert_eq!(err.error_code(), "invalid_title");
        assert!(err.to_string().contains("Please specify a value"));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&Value::Null)).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::Missing);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&json!(""))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::Missing);
    }

    #[test]
    fn test_optional_absent_is_none() {
        let spec = FieldSpec::new("description").optional();
        assert_eq!(spec.validate(None).unwrap(), None);
        assert_eq!(spec.validate(Some(&json!(""))).unwrap(), None);
    }

    #[test]
    fn test_optional_present_still_validated() {
        let spec = FieldSpec::new("description").optional().max_len(3);
        let err = spec.validate(Some(&json!("too long"))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::TooLong);
    }

    #[test]
    fn test_number_coerces_to_string() {
        let spec = FieldSpec::new("slug");
        let value = spec.validate(Some(&json!(42))).unwrap();
        assert_eq!(value.as_deref(), Some("42"));
    }

    #[test]
    fn test_bool_coerces_to_string() {
        let spec = FieldSpec::new("slug");
        let value = spec.validate(Some(&json!(true))).unwrap();
        assert_eq!(value.as_deref(), Some("true"));
    }

    #[test]
    fn test_array_fails_type_check() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&json!(["a", "b"]))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::WrongType);
        assert!(err.to_string().contains("must be type string"));
    }

    #[test]
    fn test_object_fails_type_check() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&json!({"a": 1}))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::WrongType);
    }

    #[test]
    fn test_too_short() {
        let spec = FieldSpec::new("slug").min_len(3);
        let err = spec.validate(Some(&json!("ab"))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::TooShort);
        assert!(err.to_string().contains("at least 3 characters"));
    }

    #[test]
    fn test_too_long() {
        let spec = FieldSpec::new("title").max_len(8);
        let err = spec.validate(Some(&json!("nine char"))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::TooLong);
        assert!(err.to_string().contains("at most 8 characters"));
    }

    #[test]
    fn test_default_max_len_boundary() {
        let spec = FieldSpec::new("title");

        let at_limit = "a".repeat(DEFAULT_MAX_LEN);
        assert!(spec.validate(Some(&json!(at_limit))).is_ok());

        let over_limit = "a".repeat(DEFAULT_MAX_LEN + 1);
        let err = spec.validate(Some(&json!(over_limit))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::TooLong);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // Four characters, twelve bytes; fails the printable check but not
        // the length check.
        let spec = FieldSpec::new("title").max_len(4).any_chars();
        assert!(spec.validate(Some(&json!("日本語字"))).is_ok());
    }

    #[test]
    fn test_non_printable_rejected() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&json!("hello\u{1}world"))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::NotPrintable);
        assert!(err.to_string().contains("uses invalid characters"));
    }

    #[test]
    fn test_non_ascii_rejected_when_printable() {
        let spec = FieldSpec::new("title");
        let err = spec.validate(Some(&json!("héllo"))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::NotPrintable);
    }

    #[test]
    fn test_whitespace_is_printable() {
        let spec = FieldSpec::new("content").max_len(MAX_CONTENT_LEN);
        let value = spec
            .validate(Some(&json!("line one\nline two\ttabbed\r\n")))
            .unwrap();
        assert!(value.is_some());
    }

    #[test]
    fn test_any_chars_allows_unicode() {
        let spec = FieldSpec::new("content").any_chars();
        let value = spec.validate(Some(&json!("naïve café"))).unwrap();
        assert_eq!(value.as_deref(), Some("naïve café"));
    }

    #[test]
    fn test_error_code_uses_field_name() {
        let err = FieldSpec::new("god_password").validate(None).unwrap_err();
        assert_eq!(err.error_code(), "invalid_god_password");
        assert_eq!(err.field(), "god_password");
    }

    #[test]
    fn test_content_limit() {
        let spec = FieldSpec::new("content").max_len(MAX_CONTENT_LEN);

        let big = "x".repeat(MAX_CONTENT_LEN);
        assert!(spec.validate(Some(&json!(big))).is_ok());

        let too_big = "x".repeat(MAX_CONTENT_LEN + 1);
        let err = spec.validate(Some(&json!(too_big))).unwrap_err();
        assert_eq!(err.kind(), FieldErrorKind::TooLong);
    }
}
