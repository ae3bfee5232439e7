//! Order resource

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{initial_row_version, Entity, ForeignKey, PgQuery};

const ORDER_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        column: "customer_id",
        references: "customers",
    },
    ForeignKey {
        column: "employee_id",
        references: "employees",
    },
    ForeignKey {
        column: "ship_via",
        references: "shippers",
    },
];

/// A customer order. `ship_via` references the shipper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    #[serde(default)]
    pub order_id: i32,
    pub customer_id: Option<String>,
    pub employee_id: Option<i32>,
    pub order_date: Option<NaiveDateTime>,
    pub required_date: Option<NaiveDateTime>,
    pub shipped_date: Option<NaiveDateTime>,
    pub ship_via: Option<i32>,
    pub freight: Option<Decimal>,
    pub ship_name: Option<String>,
    pub ship_address: Option<String>,
    pub ship_city: Option<String>,
    pub ship_region: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Order {
    type Id = i32;

    fn kind() -> &'static str {
        "order"
    }

    fn collection() -> &'static str {
        "orders"
    }

    fn table_name() -> &'static str {
        "orders"
    }

    fn id_column() -> &'static str {
        "order_id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "customer_id",
            "employee_id",
            "order_date",
            "required_date",
            "shipped_date",
            "ship_via",
            "freight",
            "ship_name",
            "ship_address",
            "ship_city",
            "ship_region",
            "ship_postal_code",
            "ship_country",
        ]
    }

    fn generated_identity() -> bool {
        true
    }

    fn foreign_keys() -> &'static [ForeignKey] {
        ORDER_FOREIGN_KEYS
    }

    fn id(&self) -> i32 {
        self.order_id
    }

    fn has_identity(&self) -> bool {
        self.order_id != 0
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.customer_id)
            .bind(self.employee_id)
            .bind(self.order_date)
            .bind(self.required_date)
            .bind(self.shipped_date)
            .bind(self.ship_via)
            .bind(self.freight)
            .bind(&self.ship_name)
            .bind(&self.ship_address)
            .bind(&self.ship_city)
            .bind(&self.ship_region)
            .bind(&self.ship_postal_code)
            .bind(&self.ship_country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_deserialize() {
        let order: Order = serde_json::from_str(
            r#"{
                "customer_id": "VINET",
                "employee_id": 5,
                "order_date": "1996-07-04T00:00:00",
                "ship_via": 3,
                "freight": "32.38"
            }"#,
        )
        .unwrap();

        assert_eq!(order.customer_id.as_deref(), Some("VINET"));
        assert_eq!(order.ship_via, Some(3));
        assert!(!order.has_identity());
    }
}
