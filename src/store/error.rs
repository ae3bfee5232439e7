//! Store Errors
//!
//! Error types for entity store operations.

use sqlx::error::ErrorKind;

/// Errors that can occur in the entity store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Optimistic concurrency conflict: no row matched both the identity and
    /// the row version of the write
    #[error("Row version conflict")]
    Conflict,

    /// Uniqueness, foreign key, not-null or check constraint refused the write
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::Constraint(db_err.message().to_string());
                }
                _ => {}
            }
            // class 22: value too long for its column, out of range, bad format
            if db_err.code().is_some_and(|code| code.starts_with("22")) {
                return StoreError::Constraint(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}
