//! Employee (funcionário) model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;

/// Employee record, stored under the `funcionarios` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Employee {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    /// National id (CPF), formatted as `###.###.###-##`
    pub cpf: String,
    #[serde(rename = "cargo")]
    pub job_title: String,
    #[serde(rename = "setor")]
    pub department: String,
}

impl Record for Employee {
    const KEY: &'static str = "funcionarios";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Create employee request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEmployee {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    /// Raw or formatted CPF; digits are reformatted on save
    #[validate(length(min = 1, message = "CPF is required"))]
    pub cpf: String,
    #[serde(rename = "cargo")]
    #[validate(length(min = 1, message = "Job title is required"))]
    pub job_title: String,
    #[serde(rename = "setor")]
    #[validate(length(min = 1, message = "Department is required"))]
    pub department: String,
}

/// Update employee request
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEmployee {
    #[serde(rename = "nome")]
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "CPF must not be empty"))]
    pub cpf: Option<String>,
    #[serde(rename = "cargo")]
    #[validate(length(min = 1, message = "Job title must not be empty"))]
    pub job_title: Option<String>,
    #[serde(rename = "setor")]
    #[validate(length(min = 1, message = "Department must not be empty"))]
    pub department: Option<String>,
}

/// Format a CPF as the user types it.
///
/// Non-digits are stripped and the digits grouped as `ddd.ddd.ddd-dd`,
/// formatting only as far as the input reaches. Input with more than 11
/// digits is returned unchanged.
pub fn format_cpf(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 11 {
        return value.to_string();
    }

    let mut out = String::with_capacity(14);
    for (i, d) in digits.iter().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*d);
    }
    out
}
