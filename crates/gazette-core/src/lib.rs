//! Core types for the Gazette blog server.
//!
//! This crate holds the pieces shared by every other Gazette crate:
//!
//! - [`FieldSpec`] and [`FieldError`]: per-field request validation
//! - [`AppError`] and [`ErrorBody`]: the error taxonomy and the JSON
//!   envelope it serializes to
//! - [`Article`]: the published-article data model
//! - [`Config`]: immutable process configuration read from the environment

pub mod article;
pub mod config;
pub mod error;
pub mod validate;

pub use article::Article;
pub use config::{Config, ConfigError};
pub use error::{AppError, ErrorBody};
pub use validate::{FieldError, FieldErrorKind, FieldSpec, DEFAULT_MAX_LEN, MAX_CONTENT_LEN};
