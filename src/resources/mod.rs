//! Resource module
//!
//! Entity descriptors for every addressable collection. Each kind describes
//! its table, identity, columns, validation rules and delete guards; the
//! mutation contract and the stores are generic over this trait.

pub mod customer;
pub mod employee;
pub mod order;
pub mod order_detail;
pub mod product;
pub mod product_listing;
pub mod shipper;
pub mod supplier;

pub use customer::Customer;
pub use employee::Employee;
pub use order::Order;
pub use order_detail::OrderDetail;
pub use product::Product;
pub use product_listing::ProductListing;
pub use shipper::Shipper;
pub use supplier::Supplier;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Encode, FromRow, Postgres, Type};

use crate::domain::FieldViolation;

/// Column holding the optimistic concurrency token on every table
pub const ROW_VERSION_COLUMN: &str = "row_version";

/// Untyped query that entity columns are bound onto
pub type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

/// A store-enforced reference from one of this entity's columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references: &'static str,
}

/// Pre-delete check: rows of `dependent_table` whose `foreign_key` points at
/// the instance being deleted block the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyGuard {
    pub dependent_table: &'static str,
    pub foreign_key: &'static str,
    pub message: &'static str,
}

/// Entity trait that all resource kinds implement
pub trait Entity:
    for<'r> FromRow<'r, PgRow>
    + Serialize
    + DeserializeOwned
    + Clone
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Identity type (integer id or string code)
    type Id: for<'q> Encode<'q, Postgres>
        + Type<Postgres>
        + Serialize
        + DeserializeOwned
        + Clone
        + PartialEq
        + fmt::Display
        + Send
        + Sync
        + 'static;

    /// Resource name used in messages and logs
    fn kind() -> &'static str;

    /// URL path segment of the collection
    fn collection() -> &'static str;

    /// Table or view the rows are read from and written through
    fn table_name() -> &'static str;

    /// Table that physically owns the rows; differs from `table_name` for
    /// projections
    fn storage_table() -> &'static str {
        Self::table_name()
    }

    fn id_column() -> &'static str;

    /// Non-identity columns, in the order `bind_columns` binds them
    fn columns() -> &'static [&'static str];

    /// Whether the store assigns identities when the payload carries none
    fn generated_identity() -> bool;

    /// Column the list operation is ordered by
    fn list_order() -> &'static str {
        Self::id_column()
    }

    fn foreign_keys() -> &'static [ForeignKey] {
        &[]
    }

    fn dependency_guards() -> &'static [DependencyGuard] {
        &[]
    }

    fn id(&self) -> Self::Id;

    /// Whether the payload carries an identity of its own
    fn has_identity(&self) -> bool;

    fn row_version(&self) -> i32;

    /// Bind every column of `columns()` onto `query`, in order
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;

    /// Validation stage. Kinds without declared rules keep the default and
    /// rely on store constraints.
    fn validate_fields(&self) -> Result<(), Vec<FieldViolation>> {
        Ok(())
    }
}

/// Default for the `row_version` field of a fresh payload
pub(crate) fn initial_row_version() -> i32 {
    1
}
