//! Supplier resource
//!
//! The only kind with a delete guard: a supplier stays while any product
//! still references it.

use serde::{Deserialize, Serialize};

use super::{initial_row_version, DependencyGuard, Entity, PgQuery};

const SUPPLIER_GUARDS: &[DependencyGuard] = &[DependencyGuard {
    dependent_table: "products",
    foreign_key: "supplier_id",
    message: "Cannot delete supplier with dependent products.",
}];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Supplier {
    #[serde(default)]
    pub supplier_id: i32,
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
    pub home_page: Option<String>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Supplier {
    type Id = i32;

    fn kind() -> &'static str {
        "supplier"
    }

    fn collection() -> &'static str {
        "suppliers"
    }

    fn table_name() -> &'static str {
        "suppliers"
    }

    fn id_column() -> &'static str {
        "supplier_id"
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
            "home_page",
        ]
    }

    fn generated_identity() -> bool {
        true
    }

    fn dependency_guards() -> &'static [DependencyGuard] {
        SUPPLIER_GUARDS
    }

    fn id(&self) -> i32 {
        self.supplier_id
    }

    fn has_identity(&self) -> bool {
        self.supplier_id != 0
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
            .bind(&self.home_page)
    }
}
