//! Shipper resource

use serde::{Deserialize, Serialize};

use super::{initial_row_version, Entity, PgQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shipper {
    #[serde(default)]
    pub shipper_id: i32,
    pub company_name: Option<String>,
    pub phone: Option<String>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Shipper {
    type Id = i32;

    fn kind() -> &'static str {
        "shipper"
    }

    fn collection() -> &'static str {
        "shippers"
    }

    fn table_name() -> &'static str {
        "shippers"
    }

    fn id_column() -> &'static str {
        "shipper_id"
    }

    fn columns() -> &'static [&'static str] {
        &["company_name", "phone"]
    }

    fn generated_identity() -> bool {
        true
    }

    fn id(&self) -> i32 {
        self.shipper_id
    }

    fn has_identity(&self) -> bool {
        self.shipper_id != 0
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(&self.company_name).bind(&self.phone)
    }
}
