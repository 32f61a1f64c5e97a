//! The field extraction pipeline.
//!
//! Handlers declare the fields they need as an ordered list of
//! [`FieldSpec`]s. [`extract_fields`] resolves each spec against a source
//! (server-side session values or a parsed JSON body, both presented as a
//! JSON object), runs the validator, and either short-circuits on the
//! first failure or accumulates every normalized value into a
//! [`FieldValues`] map. Extraction failures carry the same
//! `{ "text", "error" }` payload the validator produces, so a failed
//! field never reaches handler logic.

use gazette_core::{AppError, FieldSpec};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Named values produced by a successful extraction.
///
/// Only fields that validated to a present value are stored; optional
/// fields that were absent are simply not in the map.
#[derive(Debug, Clone, Default)]
pub struct FieldValues {
    values: HashMap<&'static str, String>,
}

impl FieldValues {
    /// Returns a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns a field that the extraction pipeline guaranteed present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::BadRequest`] when the field is absent; this only
    /// happens when a handler asks for a field it never declared.
    pub fn require(&self, name: &str) -> Result<&str, AppError> {
        self.get(name).ok_or(AppError::BadRequest)
    }

    /// Returns the number of extracted values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves an ordered list of field specs against a source object.
///
/// `source` is `None` when the request carries no such source at all (no
/// session, or a missing/unparseable JSON body). An absent source fails
/// with `bad_request` as soon as a required field is declared; with only
/// optional fields it extracts nothing.
///
/// # Errors
///
/// The first failing spec short-circuits: [`AppError::BadRequest`] for an
/// absent source, or the validator's [`AppError::Field`] otherwise.
pub fn extract_fields(
    source: Option<&Map<String, Value>>,
    specs: &[FieldSpec],
) -> Result<FieldValues, AppError> {
    let mut values = FieldValues::default();

    for spec in specs {
        let Some(source) = source else {
            if spec.validate(None).is_err() {
                return Err(AppError::BadRequest);
            }
            continue;
        };

        if let Some(value) = spec.validate(source.get(spec.name()))? {
            values.values.insert(spec.name(), value);
        }
    }

    Ok(values)
}
