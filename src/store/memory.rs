//! In-memory Entity Store
//!
//! Keeps rows as JSON documents keyed by storage table and identity. Enforces
//! the same rules the database does for this schema: primary key uniqueness,
//! the foreign keys declared by each entity, and row versions on replace.
//! Used by the test suites and for running the API without a database.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::resources::{DependencyGuard, Entity, ForeignKey, ROW_VERSION_COLUMN};

use super::{EntityStore, StoreError};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<String, Value>,
    next_id: i64,
    foreign_keys: &'static [ForeignKey],
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<&'static str, Table>,
    unavailable: bool,
}

/// Lookup table referenced by products; seeded like the migration does
const CATEGORIES: &[&str] = &[
    "Beverages",
    "Condiments",
    "Confections",
    "Dairy Products",
    "Grains/Cereals",
    "Meat/Poultry",
    "Produce",
    "Seafood",
];

/// Entity store holding every row in process memory
#[derive(Debug, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut categories = Table::default();
        for (index, name) in CATEGORIES.iter().enumerate() {
            let id = index as i64 + 1;
            categories.rows.insert(
                id.to_string(),
                serde_json::json!({ "category_id": id, "category_name": name }),
            );
        }
        categories.next_id = CATEGORIES.len() as i64 + 1;

        let mut state = MemoryState::default();
        state.tables.insert("categories", categories);

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Make every subsequent call fail as if the database were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.unavailable = unavailable;
        }
    }

    /// Number of rows physically stored for `T`
    pub fn row_count<T: Entity>(&self) -> usize {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.tables.get(T::storage_table()).map(|t| t.rows.len()))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::Database(sqlx::Error::PoolClosed))?;
        if state.unavailable {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(state)
    }
}

/// Row key for an identity value as it appears in a JSON document
fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ordering for listing: nulls first, then numbers, then strings
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn to_document<T: Entity>(entity: &T) -> Result<Value, StoreError> {
    serde_json::to_value(entity).map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

fn from_document<T: Entity>(document: &Value) -> Result<T, StoreError> {
    serde_json::from_value(document.clone())
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}

impl MemoryState {
    fn table_mut<T: Entity>(&mut self) -> &mut Table {
        let table = self.tables.entry(T::storage_table()).or_default();
        table.foreign_keys = T::foreign_keys();
        if table.next_id == 0 {
            table.next_id = 1;
        }
        table
    }

    fn document<T: Entity>(&self, id: &T::Id) -> Option<&Value> {
        self.tables
            .get(T::storage_table())
            .and_then(|table| table.rows.get(&id.to_string()))
    }

    /// Every non-null foreign key of `document` must point at a stored row
    fn check_references<T: Entity>(&self, document: &Value) -> Result<(), StoreError> {
        for fk in T::foreign_keys() {
            let Some(key) = document.get(fk.column).and_then(key_of) else {
                continue;
            };
            let present = self
                .tables
                .get(fk.references)
                .map(|table| table.rows.contains_key(&key))
                .unwrap_or(false);
            if !present {
                return Err(StoreError::Constraint(format!(
                    "{}.{} references missing row {} in {}",
                    T::storage_table(),
                    fk.column,
                    key,
                    fk.references
                )));
            }
        }
        Ok(())
    }

    fn count_references(&self, table_name: &str, column: &str, key: &str) -> i64 {
        self.tables
            .get(table_name)
            .map(|table| {
                table
                    .rows
                    .values()
                    .filter(|row| row.get(column).and_then(key_of).as_deref() == Some(key))
                    .count() as i64
            })
            .unwrap_or(0)
    }

    /// First table holding a row that references `key` in `target`
    fn referencing_table(&self, target: &str, key: &str) -> Option<&'static str> {
        self.tables.iter().find_map(|(name, table)| {
            table
                .foreign_keys
                .iter()
                .filter(|fk| fk.references == target)
                .any(|fk| self.count_references(name, fk.column, key) > 0)
                .then_some(*name)
        })
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn list<T: Entity>(&self) -> Result<Vec<T>, StoreError> {
        let state = self.lock()?;
        let Some(table) = state.tables.get(T::storage_table()) else {
            return Ok(Vec::new());
        };

        let mut documents: Vec<&Value> = table.rows.values().collect();
        documents.sort_by(|a, b| {
            compare_values(
                a.get(T::list_order()).unwrap_or(&Value::Null),
                b.get(T::list_order()).unwrap_or(&Value::Null),
            )
        });

        documents.into_iter().map(from_document::<T>).collect()
    }

    async fn get<T: Entity>(&self, id: &T::Id) -> Result<Option<T>, StoreError> {
        let state = self.lock()?;
        state.document::<T>(id).map(from_document::<T>).transpose()
    }

    async fn insert<T: Entity>(&self, entity: &T) -> Result<T, StoreError> {
        let mut state = self.lock()?;
        let mut document = to_document(entity)?;

        if !entity.has_identity() && !T::generated_identity() {
            return Err(StoreError::Constraint(format!(
                "{} requires a non-empty {}",
                T::storage_table(),
                T::id_column()
            )));
        }
        state.check_references::<T>(&document)?;

        let table = state.table_mut::<T>();
        if !entity.has_identity() {
            document[T::id_column()] = Value::from(table.next_id);
        }
        let key = document
            .get(T::id_column())
            .and_then(key_of)
            .ok_or_else(|| StoreError::Constraint(format!("invalid {}", T::id_column())))?;

        if table.rows.contains_key(&key) {
            return Err(StoreError::Constraint(format!(
                "duplicate key {} in {}",
                key,
                T::storage_table()
            )));
        }
        document[ROW_VERSION_COLUMN] = Value::from(1);

        // a generated id past the range of T::Id fails to decode
        let stored = from_document::<T>(&document).map_err(|_| {
            StoreError::Constraint(format!(
                "{} {} is out of range for {}",
                T::id_column(),
                key,
                T::storage_table()
            ))
        })?;

        if let Ok(numeric) = key.parse::<i64>() {
            table.next_id = table.next_id.max(numeric.saturating_add(1));
        }
        table.rows.insert(key, document);

        Ok(stored)
    }

    async fn replace<T: Entity>(&self, id: &T::Id, entity: &T) -> Result<(), StoreError> {
        let mut state = self.lock()?;

        let current_version = state
            .document::<T>(id)
            .and_then(|document| document.get(ROW_VERSION_COLUMN))
            .and_then(Value::as_i64);
        match current_version {
            Some(version) if version == i64::from(entity.row_version()) => {}
            _ => return Err(StoreError::Conflict),
        }

        let mut document = to_document(entity)?;
        state.check_references::<T>(&document)?;

        document[ROW_VERSION_COLUMN] = Value::from(i64::from(entity.row_version()) + 1);
        state
            .table_mut::<T>()
            .rows
            .insert(id.to_string(), document);

        Ok(())
    }

    async fn delete<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let key = id.to_string();

        if state.document::<T>(id).is_none() {
            return Ok(false);
        }
        if let Some(dependent) = state.referencing_table(T::storage_table(), &key) {
            return Err(StoreError::Constraint(format!(
                "{} {} is still referenced from {}",
                T::storage_table(),
                key,
                dependent
            )));
        }

        Ok(state.table_mut::<T>().rows.remove(&key).is_some())
    }

    async fn exists<T: Entity>(&self, id: &T::Id) -> Result<bool, StoreError> {
        let state = self.lock()?;
        Ok(state.document::<T>(id).is_some())
    }

    async fn count_referencing<T: Entity>(
        &self,
        guard: &DependencyGuard,
        id: &T::Id,
    ) -> Result<i64, StoreError> {
        let state = self.lock()?;
        Ok(state.count_references(guard.dependent_table, guard.foreign_key, &id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Customer, Product, ProductListing, Shipper, Supplier};

    fn shipper(name: &str) -> Shipper {
        serde_json::from_value(serde_json::json!({ "company_name": name })).unwrap()
    }

    fn product(name: &str, supplier_id: Option<i32>) -> Product {
        serde_json::from_value(serde_json::json!({
            "product_name": name,
            "supplier_id": supplier_id,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();

        let first = store.insert(&shipper("Speedy Express")).await.unwrap();
        let second = store.insert(&shipper("United Package")).await.unwrap();

        assert_eq!(first.shipper_id, 1);
        assert_eq!(second.shipper_id, 2);
        assert_eq!(second.row_version, 1);
        assert_eq!(store.row_count::<Shipper>(), 2);
    }

    #[tokio::test]
    async fn test_explicit_id_advances_sequence_and_rejects_duplicates() {
        let store = MemoryStore::new();
        let mut explicit = shipper("Federal Shipping");
        explicit.shipper_id = 10;

        store.insert(&explicit).await.unwrap();
        let next = store.insert(&shipper("Later")).await.unwrap();
        assert_eq!(next.shipper_id, 11);

        let duplicate = store.insert(&explicit).await;
        assert!(matches!(duplicate, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_exhausted_sequence_leaves_table_intact() {
        let store = MemoryStore::new();
        let mut last = shipper("Federal Shipping");
        last.shipper_id = i32::MAX;
        store.insert(&last).await.unwrap();

        let overflow = store.insert(&shipper("One Too Many")).await;
        assert!(matches!(overflow, Err(StoreError::Constraint(_))));

        assert_eq!(store.row_count::<Shipper>(), 1);
        let listed: Vec<Shipper> = store.list().await.unwrap();
        assert_eq!(listed[0].shipper_id, i32::MAX);
    }

    #[tokio::test]
    async fn test_customer_requires_code() {
        let store = MemoryStore::new();
        let customer: Customer =
            serde_json::from_value(serde_json::json!({ "company_name": "Nameless" })).unwrap();

        let result = store.insert(&customer).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_replace_checks_row_version() {
        let store = MemoryStore::new();
        let stored = store.insert(&shipper("Speedy Express")).await.unwrap();

        let mut renamed = stored.clone();
        renamed.company_name = Some("Speedy".to_string());
        store.replace(&stored.shipper_id, &renamed).await.unwrap();

        // second writer still holds version 1
        let stale = store.replace(&stored.shipper_id, &stored).await;
        assert!(matches!(stale, Err(StoreError::Conflict)));

        let current: Shipper = store.get(&stored.shipper_id).await.unwrap().unwrap();
        assert_eq!(current.company_name.as_deref(), Some("Speedy"));
        assert_eq!(current.row_version, 2);
    }

    #[tokio::test]
    async fn test_replace_missing_row_is_conflict() {
        let store = MemoryStore::new();
        let mut ghost = shipper("Ghost");
        ghost.shipper_id = 42;

        let result = store.replace(&42, &ghost).await;
        assert!(matches!(result, Err(StoreError::Conflict)));
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let store = MemoryStore::new();

        let orphan = store.insert(&product("Chai", Some(99))).await;
        assert!(matches!(orphan, Err(StoreError::Constraint(_))));

        let supplier: Supplier = serde_json::from_value(serde_json::json!({
            "company_name": "Exotic Liquids"
        }))
        .unwrap();
        let supplier = store.insert(&supplier).await.unwrap();
        store
            .insert(&product("Chai", Some(supplier.supplier_id)))
            .await
            .unwrap();

        let guard = Supplier::dependency_guards()[0];
        let count = store
            .count_referencing::<Supplier>(&guard, &supplier.supplier_id)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let refused = store.delete::<Supplier>(&supplier.supplier_id).await;
        assert!(matches!(refused, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_categories_are_seeded() {
        let store = MemoryStore::new();
        let mut beverage = product("Chai", None);
        beverage.category_id = Some(1);
        store.insert(&beverage).await.unwrap();

        let mut unknown = product("Mystery", None);
        unknown.category_id = Some(42);
        let result = store.insert(&unknown).await;
        assert!(matches!(result, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_listing_projection_reads_products_by_name() {
        let store = MemoryStore::new();
        store.insert(&product("Tofu", None)).await.unwrap();
        store.insert(&product("Chai", None)).await.unwrap();
        store.insert(&product("Konbu", None)).await.unwrap();

        let products: Vec<Product> = store.list().await.unwrap();
        let listing: Vec<ProductListing> = store.list().await.unwrap();

        assert_eq!(products[0].product_name.as_deref(), Some("Tofu"));
        let names: Vec<&str> = listing
            .iter()
            .filter_map(|p| p.product_name.as_deref())
            .collect();
        assert_eq!(names, vec!["Chai", "Konbu", "Tofu"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let result = store.list::<Shipper>().await;
        assert!(matches!(result, Err(StoreError::Database(_))));

        store.set_unavailable(false);
        assert!(store.list::<Shipper>().await.unwrap().is_empty());
    }

    #[test]
    fn test_compare_values_orders_nulls_first() {
        let mut values = vec![
            Value::from("b"),
            Value::Null,
            Value::from(2),
            Value::from("a"),
            Value::from(1),
        ];
        values.sort_by(compare_values);

        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::from(1),
                Value::from(2),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }
}
