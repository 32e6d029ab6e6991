//! Read-side views built from the inventory stores

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use super::{employee::Employee, epi::Epi};
use crate::inventory::expiration::ExpirationStatus;

/// Expired equipment with the days elapsed since expiration
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiredEpi {
    pub epi: Epi,
    pub days_overdue: i64,
    /// Names of the employees currently holding it
    pub holders: Vec<String>,
}

/// Equipment inside the warning window
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiringEpi {
    pub epi: Epi,
    pub days_remaining: i64,
    pub holders: Vec<String>,
}

/// One piece of equipment held by an employee
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HeldEpi {
    /// Assignment link id, used to unassign
    pub assignment_id: String,
    pub delivery_date: NaiveDate,
    pub epi: Epi,
    #[schema(value_type = Object)]
    pub status: ExpirationStatus,
}

/// Equipment currently held by an employee
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeHoldings {
    pub employee: Employee,
    pub count: usize,
    pub items: Vec<HeldEpi>,
}

/// Employees linked to one piece of equipment
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EquipmentHolders {
    pub equipment_id: String,
    pub holders: Vec<String>,
}
