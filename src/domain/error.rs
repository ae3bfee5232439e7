//! Resource Error Types
//!
//! The fixed set of outcomes the mutation contract can end in, other than
//! success. Transport mapping lives in `crate::error`.

use thiserror::Error;

use crate::store::StoreError;

use super::FieldViolation;

/// Failure outcomes of the resource mutation contract
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Payload failed the validation stage; nothing was written
    #[error("Validation failed: {} field violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Path identity and body identity disagree; nothing was written
    #[error("Invalid ID: path {path} does not match body {body}")]
    IdentityMismatch { path: String, body: String },

    /// No row with this identity
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Store or dependency guard refused the write
    #[error("{0}")]
    ConstraintViolation(String),

    /// Row changed since the caller read it and still exists
    #[error("Concurrency conflict: {kind} {id} was modified by another request")]
    ConcurrencyConflict { kind: &'static str, id: String },

    /// Unclassified store failure
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl ResourceError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
