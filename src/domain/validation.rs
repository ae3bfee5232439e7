//! Validation Stage
//!
//! Field-level constraints are declared on the entity structs with
//! `validator` attributes. This module runs them and flattens the result
//! into a stable list of violations.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// A single violated field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Run every declared rule on `value`, collecting all violations.
///
/// Violations are sorted by field name so responses are deterministic.
pub fn check<V: Validate>(value: &V) -> Result<(), Vec<FieldViolation>> {
    value.validate().map_err(|errors| flatten(&errors))
}

/// Flatten `ValidationErrors` into one entry per violated rule
pub fn flatten(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| FieldViolation {
                field: field.to_string(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, err.code)),
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    violations
}

/// Custom rule for money columns: the value may not be negative
pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some(Cow::Borrowed("value must not be negative"));
        return Err(err);
    }
    Ok(())
}
