//! Product resource

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{validation, FieldViolation};

use super::{initial_row_version, Entity, ForeignKey, PgQuery};

pub(crate) const PRODUCT_COLUMNS: &[&str] = &[
    "product_name",
    "supplier_id",
    "category_id",
    "quantity_per_unit",
    "unit_price",
    "units_in_stock",
    "units_on_order",
    "reorder_level",
    "discontinued",
];

pub(crate) const PRODUCT_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        column: "supplier_id",
        references: "suppliers",
    },
    ForeignKey {
        column: "category_id",
        references: "categories",
    },
];

/// A product offered for sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Product {
    #[serde(default)]
    pub product_id: i32,
    #[validate(
        required(message = "product_name is required"),
        length(min = 1, max = 40, message = "product_name must be 1 to 40 characters")
    )]
    pub product_name: Option<String>,
    pub supplier_id: Option<i32>,
    pub category_id: Option<i32>,
    #[validate(length(max = 20, message = "quantity_per_unit must be at most 20 characters"))]
    pub quantity_per_unit: Option<String>,
    #[validate(custom(function = "validation::non_negative_decimal"))]
    pub unit_price: Option<Decimal>,
    #[validate(range(min = 0, message = "units_in_stock must not be negative"))]
    pub units_in_stock: Option<i16>,
    #[validate(range(min = 0, message = "units_on_order must not be negative"))]
    pub units_on_order: Option<i16>,
    #[validate(range(min = 0, message = "reorder_level must not be negative"))]
    pub reorder_level: Option<i16>,
    #[serde(default)]
    pub discontinued: bool,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Product {
    type Id = i32;

    fn kind() -> &'static str {
        "product"
    }

    fn collection() -> &'static str {
        "products"
    }

    fn table_name() -> &'static str {
        "products"
    }

    fn id_column() -> &'static str {
        "product_id"
    }

    fn columns() -> &'static [&'static str] {
        PRODUCT_COLUMNS
    }

    fn generated_identity() -> bool {
        true
    }

    fn foreign_keys() -> &'static [ForeignKey] {
        PRODUCT_FOREIGN_KEYS
    }

    fn id(&self) -> i32 {
        self.product_id
    }

    fn has_identity(&self) -> bool {
        self.product_id != 0
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.product_name)
            .bind(self.supplier_id)
            .bind(self.category_id)
            .bind(&self.quantity_per_unit)
            .bind(self.unit_price)
            .bind(self.units_in_stock)
            .bind(self.units_on_order)
            .bind(self.reorder_level)
            .bind(self.discontinued)
    }

    fn validate_fields(&self) -> Result<(), Vec<FieldViolation>> {
        validation::check(self)
    }
}
