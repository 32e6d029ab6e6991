//! Equipment (EPI) model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;

/// Equipment record, stored under the `epis` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Epi {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// Certificate (CA) expiration date
    #[serde(rename = "validade")]
    pub expiration_date: NaiveDate,
    /// Certificate of approval (CA) number
    #[serde(rename = "ca")]
    pub certificate_number: String,
    /// Category / purpose
    #[serde(rename = "tipo")]
    pub category: String,
    /// Usage instructions
    #[serde(rename = "uso")]
    pub usage: String,
    #[serde(rename = "fabricante")]
    pub manufacturer: String,
    #[serde(rename = "entrega")]
    pub delivery_date: NaiveDate,
}

impl Record for Epi {
    const KEY: &'static str = "epis";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEpi {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Expiration date (YYYY-MM-DD)
    #[serde(rename = "validade")]
    pub expiration_date: String,
    #[serde(rename = "ca")]
    #[validate(length(min = 1, message = "CA number is required"))]
    pub certificate_number: String,
    #[serde(rename = "tipo")]
    #[validate(length(min = 1, message = "Type is required"))]
    pub category: String,
    #[serde(rename = "uso")]
    #[validate(length(min = 1, message = "Usage is required"))]
    pub usage: String,
    #[serde(rename = "fabricante")]
    #[validate(length(min = 1, message = "Manufacturer is required"))]
    pub manufacturer: String,
    /// Delivery date (YYYY-MM-DD)
    #[serde(rename = "entrega")]
    pub delivery_date: String,
}

/// Update equipment request; absent fields are left untouched
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEpi {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "validade")]
    #[validate(length(min = 1, message = "Expiration date must not be empty"))]
    pub expiration_date: Option<String>,
    #[serde(rename = "ca")]
    #[validate(length(min = 1, message = "CA number must not be empty"))]
    pub certificate_number: Option<String>,
    #[serde(rename = "tipo")]
    #[validate(length(min = 1, message = "Type must not be empty"))]
    pub category: Option<String>,
    #[serde(rename = "uso")]
    #[validate(length(min = 1, message = "Usage must not be empty"))]
    pub usage: Option<String>,
    #[serde(rename = "fabricante")]
    #[validate(length(min = 1, message = "Manufacturer must not be empty"))]
    pub manufacturer: Option<String>,
    #[serde(rename = "entrega")]
    #[validate(length(min = 1, message = "Delivery date must not be empty"))]
    pub delivery_date: Option<String>,
}

/// Certificate renewal: new CA number and expiration date
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RenewCertificate {
    #[serde(rename = "ca")]
    #[validate(length(min = 1, message = "CA number is required"))]
    pub certificate_number: String,
    #[serde(rename = "validade")]
    pub expiration_date: String,
}
