//! Application error taxonomy and JSON envelope.
//!
//! Every failed request is reported with the same payload shape:
//!
//! ```json
//! { "text": "Unauthorized!", "error": "unauthorized" }
//! ```
//!
//! [`AppError`] enumerates the failure classes and maps each to its HTTP
//! status code and machine error code; [`ErrorBody`] is the serializable
//! envelope.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::FieldError;

/// The uniform JSON error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub text: String,
    /// Machine error code, e.g. `invalid_title` or `unauthorized`.
    pub error: String,
}

/// Request-level failures.
#[derive(Debug, Error)]
pub enum AppError {
    /// A named field failed validation.
    #[error("{0}")]
    Field(#[from] FieldError),

    /// The request was missing its session or body entirely.
    #[error("Bad request!")]
    BadRequest,

    /// The session secret did not match the configured god password.
    #[error("Unauthorized!")]
    Unauthorized,

    /// An article with the requested slug already exists.
    #[error("Slug exists!")]
    SlugExists,

    /// The article store failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Field(_) | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::SlugExists => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine error code used in the JSON payload.
    #[must_use]
    pub fn error_code(&self) -> String {
        match self {
            Self::Field(err) => err.error_code(),
            Self::BadRequest => "bad_request".to_string(),
            Self::Unauthorized => "unauthorized".to_string(),
            Self::SlugExists => "slug_exists".to_string(),
            Self::Storage(_) => "storage_error".to_string(),
        }
    }

    /// Builds the JSON envelope for this error.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            text: self.to_string(),
            error: self.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::FieldSpec;

    #[test]
    fn test_field_error_maps_to_400() {
        let field_err = FieldSpec::new("title").validate(None).unwrap_err();
        let err = AppError::from(field_err);

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "invalid_title");
    }

    #[test]
    fn test_bad_request() {
        let err = AppError::BadRequest;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "bad_request");
        assert_eq!(err.to_string(), "Bad request!");
    }

    #[test]
    fn test_unauthorized_maps_to_403() {
        let err = AppError::Unauthorized;
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), "unauthorized");
    }

    #[test]
    fn test_slug_exists_maps_to_409() {
        let err = AppError::SlugExists;
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "slug_exists");
    }

    #[test]
    fn test_body_shape() {
        let body = AppError::Unauthorized.body();
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["text"], "Unauthorized!");
        assert_eq!(json["error"], "unauthorized");
    }

    #[test]
    fn test_field_error_body_carries_message() {
        let field_err = FieldSpec::new("slug").validate(None).unwrap_err();
        let body = AppError::from(field_err).body();

        assert!(body.text.contains("Please specify a value for 'slug'!"));
        assert_eq!(body.error, "invalid_slug");
    }
}
