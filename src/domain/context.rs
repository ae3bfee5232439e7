//! Operation Context
//!
//! Contains metadata about the current request for tracing.

use uuid::Uuid;

/// Context for an operation, carried from the transport into the contract.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Correlation ID for request tracing (taken from `x-request-id`)
    pub correlation_id: Option<Uuid>,
}

impl OperationContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self {
            correlation_id: None,
        }
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}
