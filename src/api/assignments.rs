//! Assignment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::assignment::{Assignment, CreateAssignment},
    services::inventory::InventoryService,
};

/// List all assignment links, dangling ones included
#[utoipa::path(
    get,
    path = "/assignments",
    tag = "assignments",
    responses(
        (status = 200, description = "Assignment links", body = Vec<Assignment>)
    )
)]
pub async fn list_assignments(State(state): State<crate::AppState>) -> Json<Vec<Assignment>> {
    Json(state.services.inventory.list_assignments().await)
}

/// Assign equipment to an employee, delivered today
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "assignments",
    request_body = CreateAssignment,
    responses(
        (status = 201, description = "Equipment assigned", body = Assignment),
        (status = 404, description = "Equipment or employee not found")
    )
)]
pub async fn create_assignment(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateAssignment>,
) -> AppResult<(StatusCode, Json<Assignment>)> {
    let link = state
        .services
        .inventory
        .assign(&data, InventoryService::today())
        .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Unassign; succeeds even when the link does not exist
#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    tag = "assignments",
    params(("id" = String, Path, description = "Assignment link ID")),
    responses(
        (status = 204, description = "Assignment removed")
    )
)]
pub async fn delete_assignment(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.inventory.unassign(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
