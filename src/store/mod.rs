//! Entity Store module
//!
//! The only shared mutable resource. Every contract operation ends in at
//! most one write through this interface.

mod error;
pub mod memory;
pub mod postgres;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::resources::{DependencyGuard, Entity};

/// Storage interface consumed by the resource mutation contract
///
/// `replace` reports `StoreError::Conflict` when no row matches both the
/// identity and the row version of the payload. It never reports absence on
/// its own; callers re-check with `exists`.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// All rows of `T` in listing order
    async fn list<T: Entity>(&self) -> Result<Vec<T>, StoreError>;

    async fn get<T: Entity>(&self, id: &T::Id) -> Result<Option<T>, StoreError>;

    /// Insert a new row and return it as stored (identity resolved)
    async fn insert<T: Entity>(&self, entity: &T) -> Result<T, StoreError>;

    /// Overwrite every column of the row, guarded by its row version
    async fn replace<T: Entity>(&self, id: &T::Id, entity: &T) -> Result<(), StoreError>;

    /// Returns false when there was no row to delete
    async fn delete<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError>;

    async fn exists<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError>;

    /// Number of rows in the guard's dependent table referencing `id`
    async fn count_referencing<T: Entity>(
        &self,
        guard: &DependencyGuard,
        id: &T::Id,
    ) -> Result<i64, StoreError>;
}
