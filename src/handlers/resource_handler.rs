//! Resource Handler
//!
//! The mutation contract shared by every resource kind. Each operation runs
//! its local checks first and then issues at most one write to the store.

use std::marker::PhantomData;

use crate::domain::{OperationContext, ResourceError};
use crate::resources::Entity;
use crate::store::{EntityStore, StoreError};

/// Result of a successful create
#[derive(Debug, Clone)]
pub struct Created<T: Entity> {
    pub id: T::Id,
    pub entity: T,
}

/// Handler for one resource kind over one store
pub struct ResourceHandler<T, S> {
    store: S,
    _entity: PhantomData<fn() -> T>,
}

impl<T, S> ResourceHandler<T, S>
where
    T: Entity,
    S: EntityStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    // =========================================================================
    // List
    // =========================================================================

    pub async fn list(&self, context: &OperationContext) -> Result<Vec<T>, ResourceError> {
        let rows = self
            .store
            .list::<T>()
            .await
            .map_err(ResourceError::StoreUnavailable)?;

        tracing::debug!(
            kind = T::kind(),
            count = rows.len(),
            correlation_id = ?context.correlation_id,
            "Listed resources"
        );

        Ok(rows)
    }

    // =========================================================================
    // Get
    // =========================================================================

    pub async fn get(&self, id: &T::Id, _context: &OperationContext) -> Result<T, ResourceError> {
        self.store
            .get::<T>(id)
            .await
            .map_err(ResourceError::StoreUnavailable)?
            .ok_or_else(|| ResourceError::not_found(T::kind(), id))
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Validate, then insert. Constraint failures from the store are client
    /// errors; everything else is a store failure.
    pub async fn create(
        &self,
        payload: T,
        context: &OperationContext,
    ) -> Result<Created<T>, ResourceError> {
        payload.validate_fields().map_err(ResourceError::Validation)?;

        let entity = match self.store.insert(&payload).await {
            Ok(entity) => entity,
            Err(StoreError::Constraint(message)) => {
                tracing::warn!(
                    kind = T::kind(),
                    reason = %message,
                    correlation_id = ?context.correlation_id,
                    "Store refused create"
                );
                return Err(ResourceError::ConstraintViolation(format!(
                    "Error creating the {}",
                    T::kind()
                )));
            }
            Err(e) => return Err(ResourceError::StoreUnavailable(e)),
        };

        let id = entity.id();
        tracing::info!(
            kind = T::kind(),
            id = %id,
            correlation_id = ?context.correlation_id,
            "Resource created"
        );

        Ok(Created { id, entity })
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Full replace of the row at `id`.
    ///
    /// A conflict reported by the store is disambiguated by re-checking
    /// existence: a missing row means a concurrent delete (not found), a
    /// present row means a concurrent modification (conflict).
    pub async fn update(
        &self,
        id: &T::Id,
        payload: T,
        context: &OperationContext,
    ) -> Result<(), ResourceError> {
        let body_id = payload.id();
        if &body_id != id {
            return Err(ResourceError::IdentityMismatch {
                path: id.to_string(),
                body: body_id.to_string(),
            });
        }

        payload.validate_fields().map_err(ResourceError::Validation)?;

        match self.store.replace(id, &payload).await {
            Ok(()) => {
                tracing::info!(
                    kind = T::kind(),
                    id = %id,
                    correlation_id = ?context.correlation_id,
                    "Resource updated"
                );
                Ok(())
            }
            Err(StoreError::Conflict) => {
                let exists = self
                    .store
                    .exists::<T>(id)
                    .await
                    .map_err(ResourceError::StoreUnavailable)?;

                if !exists {
                    return Err(ResourceError::not_found(T::kind(), id));
                }

                tracing::warn!(
                    kind = T::kind(),
                    id = %id,
                    row_version = payload.row_version(),
                    correlation_id = ?context.correlation_id,
                    "Concurrency error updating resource"
                );
                Err(ResourceError::ConcurrencyConflict {
                    kind: T::kind(),
                    id: id.to_string(),
                })
            }
            Err(StoreError::Constraint(message)) => {
                tracing::warn!(
                    kind = T::kind(),
                    id = %id,
                    reason = %message,
                    correlation_id = ?context.correlation_id,
                    "Store refused update"
                );
                Err(ResourceError::ConstraintViolation(format!(
                    "Error updating the {}",
                    T::kind()
                )))
            }
            Err(e) => Err(ResourceError::StoreUnavailable(e)),
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Delete after the dependency guards of `T` pass against current state
    pub async fn delete(
        &self,
        id: &T::Id,
        context: &OperationContext,
    ) -> Result<(), ResourceError> {
        let exists = self
            .store
            .exists::<T>(id)
            .await
            .map_err(ResourceError::StoreUnavailable)?;
        if !exists {
            return Err(ResourceError::not_found(T::kind(), id));
        }

        for guard in T::dependency_guards() {
            let dependents = self
                .store
                .count_referencing::<T>(guard, id)
                .await
                .map_err(ResourceError::StoreUnavailable)?;

            if dependents > 0 {
                tracing::warn!(
                    kind = T::kind(),
                    id = %id,
                    dependent_table = guard.dependent_table,
                    dependents,
                    correlation_id = ?context.correlation_id,
                    "Delete blocked by dependent rows"
                );
                return Err(ResourceError::ConstraintViolation(guard.message.to_string()));
            }
        }

        match self.store.delete::<T>(id).await {
            Ok(true) => {
                tracing::info!(
                    kind = T::kind(),
                    id = %id,
                    correlation_id = ?context.correlation_id,
                    "Resource deleted"
                );
                Ok(())
            }
            // removed by another request after the lookup
            Ok(false) => Err(ResourceError::not_found(T::kind(), id)),
            Err(StoreError::Constraint(message)) => {
                tracing::warn!(
                    kind = T::kind(),
                    id = %id,
                    reason = %message,
                    correlation_id = ?context.correlation_id,
                    "Store refused delete"
                );
                Err(ResourceError::ConstraintViolation(format!(
                    "Error deleting the {}",
                    T::kind()
                )))
            }
            Err(e) => Err(ResourceError::StoreUnavailable(e)),
        }
    }
}
