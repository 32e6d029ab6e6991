//! Assignment link between an equipment record and an employee

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;

/// Assignment link, stored under the `atribuicoes` key.
///
/// Either side may point at a record that has since been deleted; see
/// [`crate::inventory::ledger`] for how such links are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Assignment {
    pub id: String,
    #[serde(rename = "epiId")]
    pub equipment_id: String,
    #[serde(rename = "funcionarioId")]
    pub employee_id: String,
    #[serde(rename = "dataEntrega")]
    pub delivery_date: NaiveDate,
}

impl Record for Assignment {
    const KEY: &'static str = "atribuicoes";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Assign equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAssignment {
    #[serde(rename = "epiId")]
    #[validate(length(min = 1, message = "Equipment id is required"))]
    pub equipment_id: String,
    #[serde(rename = "funcionarioId")]
    #[validate(length(min = 1, message = "Employee id is required"))]
    pub employee_id: String,
}
