//! In-memory inventory: equipment, employees and the assignment ledger

pub mod expiration;
pub mod ledger;
pub mod store;

use chrono::NaiveDate;
use snowflaked::sync::Generator;

use crate::models::{
    report::{EmployeeHoldings, ExpiredEpi, ExpiringEpi, HeldEpi},
    Employee, Epi,
};
use expiration::{ExpirationPolicy, ExpirationStatus};
use ledger::AssignmentLedger;
use store::EntityStore;

static ID_GENERATOR: Generator = Generator::new(0);

/// Fresh record identifier. Monotonic within the process.
pub fn next_id() -> String {
    ID_GENERATOR.generate::<u64>().to_string()
}

/// The application's inventory state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    pub epis: EntityStore<Epi>,
    pub employees: EntityStore<Employee>,
    pub ledger: AssignmentLedger,
}

impl Inventory {
    fn holder_names(&self, equipment_id: &str) -> Vec<String> {
        self.ledger
            .employee_names_for_equipment(equipment_id, &self.epis, &self.employees)
            .into_iter()
            .collect()
    }

    /// Equipment sorted by expiration date, with their status
    fn classified(&self, policy: ExpirationPolicy, today: NaiveDate) -> Vec<(&Epi, ExpirationStatus)> {
        let mut epis: Vec<&Epi> = self.epis.iter().collect();
        epis.sort_by_key(|epi| epi.expiration_date);
        epis.into_iter()
            .map(|epi| (epi, policy.classify(epi.expiration_date, today)))
            .collect()
    }

    /// Expired equipment, most overdue first
    pub fn expired(&self, policy: ExpirationPolicy, today: NaiveDate) -> Vec<ExpiredEpi> {
        self.classified(policy, today)
            .into_iter()
            .filter_map(|(epi, status)| match status {
                ExpirationStatus::Expired { days_overdue } => Some(ExpiredEpi {
                    epi: epi.clone(),
                    days_overdue,
                    holders: self.holder_names(&epi.id),
                }),
                _ => None,
            })
            .collect()
    }

    /// Equipment inside the warning window, soonest first
    pub fn expiring(&self, policy: ExpirationPolicy, today: NaiveDate) -> Vec<ExpiringEpi> {
        self.classified(policy, today)
            .into_iter()
            .filter_map(|(epi, status)| match status {
                ExpirationStatus::ExpiringSoon { days_remaining } => Some(ExpiringEpi {
                    epi: epi.clone(),
                    days_remaining,
                    holders: self.holder_names(&epi.id),
                }),
                _ => None,
            })
            .collect()
    }

    /// Equipment currently held by one employee, in assignment order
    pub fn holdings(
        &self,
        employee: &Employee,
        policy: ExpirationPolicy,
        today: NaiveDate,
    ) -> EmployeeHoldings {
        let items: Vec<HeldEpi> = self
            .ledger
            .resolved(&self.epis, &self.employees)
            .filter(|resolved| resolved.employee.id == employee.id)
            .map(|resolved| HeldEpi {
                assignment_id: resolved.link.id.clone(),
                delivery_date: resolved.link.delivery_date,
                epi: resolved.epi.clone(),
                status: policy.classify(resolved.epi.expiration_date, today),
            })
            .collect();

        EmployeeHoldings {
            employee: employee.clone(),
            count: items.len(),
            items,
        }
    }

    pub fn equipment_holders(&self, equipment_id: &str) -> Vec<String> {
        self.holder_names(equipment_id)
    }
}
