//! Database module
//!
//! Database connection and migration utilities.

use sqlx::PgPool;

/// Tables and views every resource kind reads or writes through
pub const REQUIRED_RELATIONS: &[&str] = &[
    "categories",
    "suppliers",
    "shippers",
    "customers",
    "employees",
    "products",
    "orders",
    "order_details",
    "alphabetical_list_of_products",
];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Apply the SQL files in `migrations/`
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Check if required tables and views exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    for relation in REQUIRED_RELATIONS {
        // information_schema.tables lists views too
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(*relation)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required relation '{}' does not exist", relation);
            return Ok(false);
        }
    }

    Ok(true)
}
