//! Employee resource

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{validation, FieldViolation};

use super::{initial_row_version, Entity, ForeignKey, PgQuery};

const EMPLOYEE_FOREIGN_KEYS: &[ForeignKey] = &[ForeignKey {
    column: "reports_to",
    references: "employees",
}];

/// An employee. `reports_to` references another employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct Employee {
    #[serde(default)]
    pub employee_id: i32,
    #[validate(
        required(message = "last_name is required"),
        length(min = 1, max = 20, message = "last_name must be 1 to 20 characters")
    )]
    pub last_name: Option<String>,
    #[validate(
        required(message = "first_name is required"),
        length(min = 1, max = 10, message = "first_name must be 1 to 10 characters")
    )]
    pub first_name: Option<String>,
    #[validate(length(max = 30, message = "title must be at most 30 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 25, message = "title_of_courtesy must be at most 25 characters"))]
    pub title_of_courtesy: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    #[validate(length(max = 60, message = "address must be at most 60 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 15, message = "city must be at most 15 characters"))]
    pub city: Option<String>,
    #[validate(length(max = 15, message = "region must be at most 15 characters"))]
    pub region: Option<String>,
    #[validate(length(max = 10, message = "postal_code must be at most 10 characters"))]
    pub postal_code: Option<String>,
    #[validate(length(max = 15, message = "country must be at most 15 characters"))]
    pub country: Option<String>,
    #[validate(length(max = 24, message = "home_phone must be at most 24 characters"))]
    pub home_phone: Option<String>,
    #[validate(length(max = 4, message = "extension must be at most 4 characters"))]
    pub extension: Option<String>,
    pub notes: Option<String>,
    pub reports_to: Option<i32>,
    #[serde(default = "initial_row_version")]
    pub row_version: i32,
}

impl Entity for Employee {
    type Id = i32;

    fn kind() -> &'static str {
        "employee"
    }

    fn collection() -> &'static str {
        "employees"
    }

    fn table_name() -> &'static str {
        "employees"
    }

    fn id_column() -> &'static str {
        "employee_id"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "last_name",
            "first_name",
            "title",
            "title_of_courtesy",
            "birth_date",
            "hire_date",
            "address",
            "city",
            "region",
            "postal_code",
            "country",
            "home_phone",
            "extension",
            "notes",
            "reports_to",
        ]
    }

    fn generated_identity() -> bool {
        true
    }

    fn foreign_keys() -> &'static [ForeignKey] {
        EMPLOYEE_FOREIGN_KEYS
    }

    fn id(&self) -> i32 {
        self.employee_id
    }

    fn has_identity(&self) -> bool {
        self.employee_id != 0
    }

    fn row_version(&self) -> i32 {
        self.row_version
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(&self.last_name)
            .bind(&self.first_name)
            .bind(&self.title)
            .bind(&self.title_of_courtesy)
            .bind(self.birth_date)
            .bind(self.hire_date)
            .bind(&self.address)
            .bind(&self.city)
            .bind(&self.region)
            .bind(&self.postal_code)
            .bind(&self.country)
            .bind(&self.home_phone)
            .bind(&self.extension)
            .bind(&self.notes)
            .bind(self.reports_to)
    }

    fn validate_fields(&self) -> Result<(), Vec<FieldViolation>> {
        validation::check(self)
    }
}
