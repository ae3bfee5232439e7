//! Domain module
//!
//! Outcome taxonomy, validation stage and request context shared by every
//! resource kind.

pub mod context;
pub mod error;
pub mod validation;

pub use context::OperationContext;
pub use error::ResourceError;
pub use validation::FieldViolation;
