//! Validation & Sanitization Pipeline
//!
//! Turns a raw field map from the write boundary into either a typed draft
//! or the full, ordered list of field errors together with a sanitized copy
//! of the input for redisplay. This module never touches the store.

mod escape;
mod fields;
mod rules;
mod schemas;

use serde::Serialize;

pub use escape::escape_html;
pub use fields::{normalize_many, FieldMap, FieldValue};
pub use rules::{parse_iso_date, Check, Cleaned, FieldError, FieldRule, Pipeline};
pub use schemas::{
    validate_manufacturer, validate_vehicle, validate_vehicle_instance, validate_vehicle_type,
    ValidationOptions,
};

/// Input that was refused, kept so the submitter does not lose it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Trimmed and escaped copy of what was posted.
    pub input: FieldMap,
    pub errors: Vec<FieldError>,
}

impl Rejection {
    pub fn new(raw: &FieldMap, errors: Vec<FieldError>) -> Self {
        Self {
            input: raw.sanitized(),
            errors,
        }
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validated<D> {
    Valid(D),
    Invalid(Rejection),
}

impl<D> Validated<D> {
    pub fn into_result(self) -> Result<D, Rejection> {
        match self {
            Validated::Valid(draft) => Ok(draft),
            Validated::Invalid(rejection) => Err(rejection),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }
}
