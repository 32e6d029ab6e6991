//! Inventory service: equipment, employees, assignments and reports

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::Mutex;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    inventory::{
        expiration::{parse_iso_date, ExpirationPolicy},
        next_id,
        store::EntityStore,
        Inventory,
    },
    models::{
        assignment::CreateAssignment,
        employee::{format_cpf, CreateEmployee, UpdateEmployee},
        epi::{CreateEpi, RenewCertificate, UpdateEpi},
        report::{EmployeeHoldings, EquipmentHolders, ExpiredEpi, ExpiringEpi},
        Assignment, Employee, Epi, Record,
    },
    repository::inventory::InventoryRepository,
};

/// Formatted CPF; input with no characters left after formatting is rejected
fn required_cpf(value: &str) -> AppResult<String> {
    let cpf = format_cpf(value);
    if cpf.trim().is_empty() {
        return Err(AppError::Validation("CPF is required".to_string()));
    }
    Ok(cpf)
}

/// Owns the inventory state. Every mutation builds the next collection,
/// persists it, and only then swaps it in, all under one lock.
#[derive(Clone)]
pub struct InventoryService {
    repository: InventoryRepository,
    state: Arc<Mutex<Inventory>>,
    policy: ExpirationPolicy,
}

impl InventoryService {
    /// Load the persisted collections
    pub async fn load(repository: InventoryRepository, policy: ExpirationPolicy) -> AppResult<Self> {
        let inventory = repository.load_all().await?;
        tracing::info!(
            epis = inventory.epis.len(),
            employees = inventory.employees.len(),
            assignments = inventory.ledger.links().len(),
            "Inventory loaded"
        );
        Ok(Self {
            repository,
            state: Arc::new(Mutex::new(inventory)),
            policy,
        })
    }

    /// Current local calendar date
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn policy(&self) -> ExpirationPolicy {
        self.policy
    }

    async fn commit<T: Record>(&self, slot: &mut EntityStore<T>, next: EntityStore<T>) -> AppResult<()> {
        self.repository.save(&next).await?;
        *slot = next;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Equipment
    // ---------------------------------------------------------------------

    pub async fn list_epis(&self) -> Vec<Epi> {
        self.state.lock().await.epis.as_slice().to_vec()
    }

    pub async fn get_epi(&self, id: &str) -> AppResult<Epi> {
        self.state
            .lock()
            .await
            .epis
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("EPI {} not found", id)))
    }

    pub async fn create_epi(&self, data: &CreateEpi) -> AppResult<Epi> {
        data.validate()?;
        let epi = Epi {
            id: next_id(),
            name: data.name.trim().to_string(),
            expiration_date: parse_iso_date(&data.expiration_date)?,
            certificate_number: data.certificate_number.trim().to_string(),
            category: data.category.clone(),
            usage: data.usage.clone(),
            manufacturer: data.manufacturer.clone(),
            delivery_date: parse_iso_date(&data.delivery_date)?,
        };

        let mut inventory = self.state.lock().await;
        let mut epis = inventory.epis.clone();
        epis.append(epi.clone());
        self.commit(&mut inventory.epis, epis).await?;

        tracing::info!(id = %epi.id, ca = %epi.certificate_number, "EPI registered");
        Ok(epi)
    }

    pub async fn update_epi(&self, id: &str, data: &UpdateEpi) -> AppResult<Epi> {
        data.validate()?;
        let expiration_date = data.expiration_date.as_deref().map(parse_iso_date).transpose()?;
        let delivery_date = data.delivery_date.as_deref().map(parse_iso_date).transpose()?;

        let mut inventory = self.state.lock().await;
        let mut epi = inventory
            .epis
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("EPI {} not found", id)))?;

        if let Some(ref name) = data.name {
            epi.name = name.trim().to_string();
        }
        if let Some(date) = expiration_date {
            epi.expiration_date = date;
        }
        if let Some(ref ca) = data.certificate_number {
            epi.certificate_number = ca.trim().to_string();
        }
        if let Some(ref category) = data.category {
            epi.category = category.clone();
        }
        if let Some(ref usage) = data.usage {
            epi.usage = usage.clone();
        }
        if let Some(ref manufacturer) = data.manufacturer {
            epi.manufacturer = manufacturer.clone();
        }
        if let Some(date) = delivery_date {
            epi.delivery_date = date;
        }

        let mut epis = inventory.epis.clone();
        epis.replace(epi.clone());
        self.commit(&mut inventory.epis, epis).await?;
        Ok(epi)
    }

    /// Replace the CA number and expiration date, keeping everything else
    pub async fn renew_certificate(&self, id: &str, data: &RenewCertificate) -> AppResult<Epi> {
        data.validate()?;
        let update = UpdateEpi {
            certificate_number: Some(data.certificate_number.clone()),
            expiration_date: Some(data.expiration_date.clone()),
            ..UpdateEpi::default()
        };
        let epi = self.update_epi(id, &update).await?;
        tracing::info!(id = %epi.id, ca = %epi.certificate_number, expires = %epi.expiration_date, "CA renewed");
        Ok(epi)
    }

    /// Delete equipment. Assignment links to it are kept.
    pub async fn delete_epi(&self, id: &str) -> AppResult<()> {
        let mut inventory = self.state.lock().await;
        let mut epis = inventory.epis.clone();
        if epis.remove(id).is_none() {
            return Err(AppError::NotFound(format!("EPI {} not found", id)));
        }
        self.commit(&mut inventory.epis, epis).await?;
        tracing::info!(id = %id, "EPI deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Employees
    // ---------------------------------------------------------------------

    pub async fn list_employees(&self) -> Vec<Employee> {
        self.state.lock().await.employees.as_slice().to_vec()
    }

    pub async fn get_employee(&self, id: &str) -> AppResult<Employee> {
        self.state
            .lock()
            .await
            .employees
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    pub async fn create_employee(&self, data: &CreateEmployee) -> AppResult<Employee> {
        data.validate()?;
        let employee = Employee {
            id: next_id(),
            name: data.name.trim().to_string(),
            cpf: required_cpf(&data.cpf)?,
            job_title: data.job_title.clone(),
            department: data.department.clone(),
        };

        let mut inventory = self.state.lock().await;
        let mut employees = inventory.employees.clone();
        employees.append(employee.clone());
        self.commit(&mut inventory.employees, employees).await?;

        tracing::info!(id = %employee.id, "Employee registered");
        Ok(employee)
    }

    pub async fn update_employee(&self, id: &str, data: &UpdateEmployee) -> AppResult<Employee> {
        data.validate()?;
        let mut inventory = self.state.lock().await;
        let mut employee = inventory
            .employees
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))?;

        if let Some(ref name) = data.name {
            employee.name = name.trim().to_string();
        }
        if let Some(ref cpf) = data.cpf {
            employee.cpf = required_cpf(cpf)?;
        }
        if let Some(ref job_title) = data.job_title {
            employee.job_title = job_title.clone();
        }
        if let Some(ref department) = data.department {
            employee.department = department.clone();
        }

        let mut employees = inventory.employees.clone();
        employees.replace(employee.clone());
        self.commit(&mut inventory.employees, employees).await?;
        Ok(employee)
    }

    /// Delete an employee. Assignment links to them are kept.
    pub async fn delete_employee(&self, id: &str) -> AppResult<()> {
        let mut inventory = self.state.lock().await;
        let mut employees = inventory.employees.clone();
        if employees.remove(id).is_none() {
            return Err(AppError::NotFound(format!("Employee {} not found", id)));
        }
        self.commit(&mut inventory.employees, employees).await?;
        tracing::info!(id = %id, "Employee deleted");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Assignments
    // ---------------------------------------------------------------------

    pub async fn list_assignments(&self) -> Vec<Assignment> {
        self.state.lock().await.ledger.links().as_slice().to_vec()
    }

    /// Hand equipment to an employee, delivered `today`
    pub async fn assign(&self, data: &CreateAssignment, today: NaiveDate) -> AppResult<Assignment> {
        data.validate()?;
        let mut inventory = self.state.lock().await;
        if !inventory.epis.contains(&data.equipment_id) {
            return Err(AppError::NotFound(format!("EPI {} not found", data.equipment_id)));
        }
        if !inventory.employees.contains(&data.employee_id) {
            return Err(AppError::NotFound(format!("Employee {} not found", data.employee_id)));
        }

        let mut ledger = inventory.ledger.clone();
        let link = ledger.assign(&data.equipment_id, &data.employee_id, today);
        self.repository.save(ledger.links()).await?;
        inventory.ledger = ledger;

        tracing::info!(
            id = %link.id,
            epi = %link.equipment_id,
            employee = %link.employee_id,
            "EPI assigned"
        );
        Ok(link)
    }

    /// Remove an assignment link; absent links are a no-op
    pub async fn unassign(&self, link_id: &str) -> AppResult<Option<Assignment>> {
        let mut inventory = self.state.lock().await;
        let mut ledger = inventory.ledger.clone();
        let removed = ledger.unassign(link_id);
        if removed.is_some() {
            self.repository.save(ledger.links()).await?;
            inventory.ledger = ledger;
            tracing::info!(id = %link_id, "EPI unassigned");
        }
        Ok(removed)
    }

    // ---------------------------------------------------------------------
    // Reports
    // ---------------------------------------------------------------------

    pub async fn expired(&self, today: NaiveDate) -> Vec<ExpiredEpi> {
        self.state.lock().await.expired(self.policy, today)
    }

    pub async fn expiring(&self, today: NaiveDate) -> Vec<ExpiringEpi> {
        self.state.lock().await.expiring(self.policy, today)
    }

    pub async fn employee_holdings(&self, employee_id: &str, today: NaiveDate) -> AppResult<EmployeeHoldings> {
        let inventory = self.state.lock().await;
        let employee = inventory
            .employees
            .get(employee_id)
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;
        Ok(inventory.holdings(employee, self.policy, today))
    }

    /// Holdings of every employee, in registration order
    pub async fn all_holdings(&self, today: NaiveDate) -> Vec<EmployeeHoldings> {
        let inventory = self.state.lock().await;
        inventory
            .employees
            .iter()
            .map(|employee| inventory.holdings(employee, self.policy, today))
            .collect()
    }

    pub async fn equipment_holders(&self, equipment_id: &str) -> EquipmentHolders {
        let holders = self.state.lock().await.equipment_holders(equipment_id);
        EquipmentHolders {
            equipment_id: equipment_id.to_string(),
            holders,
        }
    }
}
