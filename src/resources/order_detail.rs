//! Order line resource

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{initial_row_version, Entity, ForeignKey, PgQuery};

const ORDER_DETAIL_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        column: "order_id",
        references: "orders",
    },
    ForeignKey {
        column: "product_id",
        references: "products",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderDetail {
    #[serde(default)]
    pub order_detail_id: i32,
    pub order_id: Option<i32>,
    pub product_id: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub quantity: Option<i16>,
    pub discount: Option<f32>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for OrderDetail {
    type Id = i32;

    fn kind() -> &'static str {
        "order detail"
    }

    fn collection() -> &'static str {
        "order-details"
    }

    fn table_name() -> &'static str {
        "order_details"
    }

    fn id_column() -> &'static str {
        "order_detail_id"
    }

    fn columns() -> &'static [&'static str] {
        &["order_id", "product_id", "unit_price", "quantity", "discount"]
    }

    fn generated_identity() -> bool {
        true
    }

    fn foreign_keys() -> &'static [ForeignKey] {
        ORDER_DETAIL_FOREIGN_KEYS
    }

    fn id(&self) -> i32 {
        self.order_detail_id
    }

    fn has_identity(&self) -> bool {
        self.order_detail_id != 0
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.order_id)
            .bind(self.product_id)
            .bind(self.unit_price)
            .bind(self.quantity)
            .bind(self.discount)
    }
}
