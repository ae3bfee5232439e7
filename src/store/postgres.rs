//! PostgreSQL Entity Store
//!
//! SQL is generated from entity metadata; column values are bound by the
//! entity itself. Row versions are compared and bumped inside the single
//! UPDATE statement, so a replace is one round trip.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::resources::{DependencyGuard, Entity, ROW_VERSION_COLUMN};

use super::{EntityStore, StoreError};

/// Entity store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new PgStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =========================================================================
// SQL generation
// =========================================================================

fn select_list<T: Entity>() -> String {
    let mut columns = Vec::with_capacity(T::columns().len() + 2);
    columns.push(T::id_column());
    columns.extend_from_slice(T::columns());
    columns.push(ROW_VERSION_COLUMN);
    columns.join(", ")
}

fn list_sql<T: Entity>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_list::<T>(),
        T::table_name(),
        T::list_order()
    )
}

fn get_sql<T: Entity>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1",
        select_list::<T>(),
        T::table_name(),
        T::id_column()
    )
}

/// Identity column is included only when the payload carries an identity
fn insert_sql<T: Entity>(with_identity: bool) -> String {
    let mut columns: Vec<&str> = Vec::with_capacity(T::columns().len() + 1);
    if with_identity {
        columns.push(T::id_column());
    }
    columns.extend_from_slice(T::columns());

    let placeholders = (1..=columns.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        T::table_name(),
        columns.join(", "),
        placeholders,
        select_list::<T>()
    )
}

/// Columns bind to $1..$n, identity to $n+1, expected row version to $n+2
fn replace_sql<T: Entity>() -> String {
    let assignments = T::columns()
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{} = ${}", column, i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let n = T::columns().len();

    format!(
        "UPDATE {table} SET {assignments}, {version} = {version} + 1 \
         WHERE {id} = ${id_param} AND {version} = ${version_param}",
        table = T::table_name(),
        assignments = assignments,
        version = ROW_VERSION_COLUMN,
        id = T::id_column(),
        id_param = n + 1,
        version_param = n + 2,
    )
}

fn delete_sql<T: Entity>() -> String {
    format!("DELETE FROM {} WHERE {} = $1", T::table_name(), T::id_column())
}

fn exists_sql<T: Entity>() -> String {
    format!(
        "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
        T::table_name(),
        T::id_column()
    )
}

fn count_referencing_sql(guard: &DependencyGuard) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = $1",
        guard.dependent_table, guard.foreign_key
    )
}

#[async_trait]
impl EntityStore for PgStore {
    async fn list<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let sql = list_sql::<T>();
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get<T: Entity>(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let sql = get_sql::<T>();
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id.clone())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert<T: Entity>(&self, entity: &T) -> Result<T, StoreError> {
        let with_identity = entity.has_identity() || !T::generated_identity();
        let sql = insert_sql::<T>(with_identity);

        let mut query = sqlx::query(&sql);
        if with_identity {
            query = query.bind(entity.id());
        }
        let row = entity.bind_columns(query).fetch_one(&self.pool).await?;

        Ok(T::from_row(&row)?)
    }

    async fn replace<T: Entity>(&self, id: &T::Id, entity: &T) -> Result<(), StoreError> {
        let sql = replace_sql::<T>();

        let rows_affected = entity
            .bind_columns(sqlx::query(&sql))
            .bind(id.clone())
            .bind(entity.row_version())
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::Conflict);
        }

        Ok(())
    }

    async fn delete<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError> {
        let sql = delete_sql::<T>();
        let rows_affected = sqlx::query(&sql)
            .bind(id.clone())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    async fn exists<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError> {
        let sql = exists_sql::<T>();
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id.clone())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn count_referencing<T: Entity>(
        &self,
        guard: &DependencyGuard,
        id: &T::Id,
    ) -> Result<i64, StoreError> {
        let sql = count_referencing_sql(guard);
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(id.clone())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
