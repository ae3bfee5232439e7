//! Customer resource
//!
//! Customers are keyed by a client-chosen code (e.g. "ALFKI"), never by a
//! generated number.

use serde::{Deserialize, Serialize};

use super::{initial_row_version, Entity, PgQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    #[serde(default)]
    pub customer_id: String,
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Customer {
    type Id = String;

    fn kind() -> &'static str {
        "customer"
    }

    fn collection() -> &'static str {
        "customers"
    }

    fn table_name() -> &'static str {
        "customers"
    }

    fn id_column() -> &'static str {
        "customer_id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "company_name",
            "contact_name",
            "contact_title",
            "address",
            "city",
            "region",
            "postal_code",
            "country",
            "phone",
            "fax",
        ]
    }

    fn generated_identity() -> bool {
        false
    }

    fn id(&self) -> String {
        self.customer_id.clone()
    }

    fn has_identity(&self) -> bool {
        !self.customer_id.is_empty()
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.company_name)
            .bind(&self.contact_name)
            .bind(&self.contact_title)
            .bind(&self.address)
            .bind(&self.city)
            .bind(&self.region)
            .bind(&self.postal_code)
            .bind(&self.country)
            .bind(&self.phone)
            .bind(&self.fax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_code_identity() {
        let customer: Customer = serde_json::from_str(
            r#"{"customer_id": "ALFKI", "company_name": "Alfreds Futterkiste"}"#,
        )
        .unwrap();

        assert!(customer.has_identity());
        assert_eq!(customer.id(), "ALFKI");
        assert!(!Customer::generated_identity());
    }

    #[test]
    fn test_missing_code_has_no_identity() {
        let customer: Customer = serde_json::from_str(r#"{"company_name": "Nameless"}"#).unwrap();

        assert!(!customer.has_identity());
    }
}
