//! Integration tests against PostgreSQL
//!
//! Require DATABASE_URL; run with `cargo test -- --ignored`.

use std::sync::{Mutex, MutexGuard};

use northwind_api::domain::{OperationContext, ResourceError};
use northwind_api::handlers::ResourceHandler;
use northwind_api::resources::{Customer, Order, Product, ProductListing, Shipper, Supplier};
use northwind_api::PgStore;
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

mod common;

// Every test truncates the same tables
static DB_LOCK: Mutex<()> = Mutex::new(());

fn lock_db() -> MutexGuard<'static, ()> {
    DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn context() -> OperationContext {
    OperationContext::new().with_correlation_id(Uuid::new_v4())
}

#[tokio::test]
#[ignore]
async fn test_create_get_update_roundtrip() {
    let _guard = lock_db();
    let store = PgStore::new(common::setup_test_db().await);
    let suppliers = ResourceHandler::<Supplier, _>::new(store.clone());
    let products = ResourceHandler::<Product, _>::new(store.clone());
    let ctx = context();

    let supplier: Supplier =
        serde_json::from_value(json!({ "company_name": "Exotic Liquids" })).unwrap();
    let supplier = suppliers.create(supplier, &ctx).await.unwrap();
    assert_eq!(supplier.id, 1);

    let product: Product = serde_json::from_value(json!({
        "product_name": "Chai",
        "supplier_id": supplier.id,
        "category_id": 1,
        "unit_price": "18.00",
        "units_in_stock": 39
    }))
    .unwrap();
    let created = products.create(product, &ctx).await.unwrap();
    assert_eq!(created.entity.row_version, 1);

    let mut replacement = created.entity.clone();
    replacement.unit_price = Some(dec!(19.5));
    replacement.units_in_stock = None;
    products.update(&created.id, replacement, &ctx).await.unwrap();

    let fetched = products.get(&created.id, &ctx).await.unwrap();
    assert_eq!(fetched.unit_price, Some(dec!(19.5)));
    assert_eq!(fetched.units_in_stock, None);
    assert_eq!(fetched.row_version, 2);
}

#[tokio::test]
#[ignore]
async fn test_stale_update_and_deleted_row() {
    let _guard = lock_db();
    let store = PgStore::new(common::setup_test_db().await);
    let shippers = ResourceHandler::<Shipper, _>::new(store);
    let ctx = context();

    let shipper: Shipper =
        serde_json::from_value(json!({ "company_name": "Federal Shipping" })).unwrap();
    let created = shippers.create(shipper, &ctx).await.unwrap();

    let mut first = created.entity.clone();
    first.phone = Some("(503) 555-9931".to_string());
    shippers.update(&created.id, first, &ctx).await.unwrap();

    let stale = shippers.update(&created.id, created.entity.clone(), &ctx).await;
    assert!(matches!(stale, Err(ResourceError::ConcurrencyConflict { .. })));

    shippers.delete(&created.id, &ctx).await.unwrap();
    let gone = shippers.update(&created.id, created.entity, &ctx).await;
    assert!(matches!(gone, Err(ResourceError::NotFound { .. })));
}

#[tokio::test]
#[ignore]
async fn test_guards_and_foreign_keys() {
    let _guard = lock_db();
    let store = PgStore::new(common::setup_test_db().await);
    let suppliers = ResourceHandler::<Supplier, _>::new(store.clone());
    let products = ResourceHandler::<Product, _>::new(store.clone());
    let customers = ResourceHandler::<Customer, _>::new(store.clone());
    let orders = ResourceHandler::<Order, _>::new(store.clone());
    let ctx = context();

    let supplier: Supplier =
        serde_json::from_value(json!({ "company_name": "Tokyo Traders" })).unwrap();
    let supplier = suppliers.create(supplier, &ctx).await.unwrap();
    let product: Product = serde_json::from_value(json!({
        "product_name": "Ikura",
        "supplier_id": supplier.id
    }))
    .unwrap();
    products.create(product, &ctx).await.unwrap();

    let blocked = suppliers.delete(&supplier.id, &ctx).await;
    match blocked {
        Err(ResourceError::ConstraintViolation(message)) => {
            assert_eq!(message, "Cannot delete supplier with dependent products.");
        }
        other => panic!("Expected ConstraintViolation, got: {:?}", other),
    }

    let customer: Customer = serde_json::from_value(json!({
        "customer_id": "VINET",
        "company_name": "Vins et alcools Chevalier"
    }))
    .unwrap();
    customers.create(customer, &ctx).await.unwrap();
    let order: Order = serde_json::from_value(json!({ "customer_id": "VINET" })).unwrap();
    orders.create(order, &ctx).await.unwrap();

    let refused = customers.delete(&"VINET".to_string(), &ctx).await;
    assert!(matches!(refused, Err(ResourceError::ConstraintViolation(_))));

    let orphan: Order = serde_json::from_value(json!({ "customer_id": "NOONE" })).unwrap();
    let orphan = orders.create(orphan, &ctx).await;
    assert!(matches!(orphan, Err(ResourceError::ConstraintViolation(_))));
}

#[tokio::test]
#[ignore]
async fn test_listing_view_is_ordered_and_writable() {
    let _guard = lock_db();
    let store = PgStore::new(common::setup_test_db().await);
    let listing = ResourceHandler::<ProductListing, _>::new(store.clone());
    let products = ResourceHandler::<Product, _>::new(store);
    let ctx = context();

    for name in ["Tofu", "Chai", "Konbu"] {
        let entry: ProductListing =
            serde_json::from_value(json!({ "product_name": name })).unwrap();
        listing.create(entry, &ctx).await.unwrap();
    }

    let names: Vec<String> = listing
        .list(&ctx)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|p| p.product_name)
        .collect();
    assert_eq!(names, vec!["Chai", "Konbu", "Tofu"]);

    let tofu = products.get(&1, &ctx).await.unwrap();
    assert_eq!(tofu.product_name.as_deref(), Some("Tofu"));
}
