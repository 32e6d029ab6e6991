//! Equipment-to-employee assignment ledger
//!
//! Links are never cascaded away when an equipment or employee record is
//! deleted. A link whose equipment or employee no longer exists is
//! *dangling*: it stays in storage and is skipped by every read view.
//! [`AssignmentLedger::resolved`] is the one place that filtering happens.
//!
//! Assigning the same pair twice creates two links.

use chrono::NaiveDate;
use indexmap::IndexSet;

use super::{next_id, store::EntityStore};
use crate::models::{Assignment, Employee, Epi};

/// A link whose equipment and employee both exist
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLink<'a> {
    pub link: &'a Assignment,
    pub epi: &'a Epi,
    pub employee: &'a Employee,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentLedger {
    links: EntityStore<Assignment>,
}

impl AssignmentLedger {
    pub fn new(links: EntityStore<Assignment>) -> Self {
        Self { links }
    }

    pub fn links(&self) -> &EntityStore<Assignment> {
        &self.links
    }

    /// Link equipment to an employee, delivered on `today`
    pub fn assign(&mut self, equipment_id: &str, employee_id: &str, today: NaiveDate) -> Assignment {
        let link = Assignment {
            id: next_id(),
            equipment_id: equipment_id.to_string(),
            employee_id: employee_id.to_string(),
            delivery_date: today,
        };
        self.links.append(link.clone());
        link
    }

    /// Remove a link; `None` when there was nothing to remove
    pub fn unassign(&mut self, link_id: &str) -> Option<Assignment> {
        self.links.remove(link_id)
    }

    pub fn links_for_employee<'a>(
        &'a self,
        employee_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.links.iter().filter(move |link| link.employee_id == employee_id)
    }

    pub fn links_for_equipment<'a>(
        &'a self,
        equipment_id: &'a str,
    ) -> impl Iterator<Item = &'a Assignment> + 'a {
        self.links.iter().filter(move |link| link.equipment_id == equipment_id)
    }

    /// Links with both ends present, in ledger order
    pub fn resolved<'a>(
        &'a self,
        epis: &'a EntityStore<Epi>,
        employees: &'a EntityStore<Employee>,
    ) -> impl Iterator<Item = ResolvedLink<'a>> + 'a {
        self.links.iter().filter_map(move |link| {
            let epi = epis.get(&link.equipment_id)?;
            let employee = employees.get(&link.employee_id)?;
            Some(ResolvedLink { link, epi, employee })
        })
    }

    /// Names of the employees holding this equipment, first assignment first
    pub fn employee_names_for_equipment(
        &self,
        equipment_id: &str,
        epis: &EntityStore<Epi>,
        employees: &EntityStore<Employee>,
    ) -> IndexSet<String> {
        self.resolved(epis, employees)
            .filter(|resolved| resolved.link.equipment_id == equipment_id)
            .map(|resolved| resolved.employee.name.clone())
            .collect()
    }
}
