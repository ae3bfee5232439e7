//! Northwind API Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod resources;
pub mod store;

mod error;

pub use config::Config;
pub use domain::{FieldViolation, OperationContext, ResourceError};
pub use error::{AppError, ErrorResponse};
pub use store::{EntityStore, MemoryStore, PgStore, StoreError};
