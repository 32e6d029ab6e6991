//! Employee API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        employee::{CreateEmployee, Employee, UpdateEmployee},
        report::EmployeeHoldings,
    },
};

use super::ReportQuery;

/// List all employees
#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    responses(
        (status = 200, description = "Employee list", body = Vec<Employee>)
    )
)]
pub async fn list_employees(State(state): State<crate::AppState>) -> Json<Vec<Employee>> {
    Json(state.services.inventory.list_employees().await)
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee details", body = Employee),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_employee(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    let employee = state.services.inventory.get_employee(&id).await?;
    Ok(Json(employee))
}

/// Register an employee
#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee registered", body = Employee),
        (status = 400, description = "Missing field")
    )
)]
pub async fn create_employee(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let employee = state.services.inventory.create_employee(&data).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn update_employee(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    let employee = state.services.inventory.update_employee(&id, &data).await?;
    Ok(Json(employee))
}

/// Delete an employee (assignment links are kept)
#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "employees",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn delete_employee(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete_employee(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Equipment held by one employee, with expiration status
#[utoipa::path(
    get,
    path = "/employees/{id}/epis",
    tag = "employees",
    params(
        ("id" = String, Path, description = "Employee ID"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "Employee holdings", body = EmployeeHoldings),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn get_holdings(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<EmployeeHoldings>> {
    let today = query.reference_date()?;
    let holdings = state.services.inventory.employee_holdings(&id, today).await?;
    Ok(Json(holdings))
}

/// Holdings of every employee
#[utoipa::path(
    get,
    path = "/employees/holdings",
    tag = "employees",
    params(ReportQuery),
    responses(
        (status = 200, description = "Holdings per employee", body = Vec<EmployeeHoldings>)
    )
)]
pub async fn list_holdings(
    State(state): State<crate::AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<EmployeeHoldings>>> {
    let today = query.reference_date()?;
    Ok(Json(state.services.inventory.all_holdings(today).await))
}
