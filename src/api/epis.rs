//! Equipment (EPI) API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        epi::{CreateEpi, Epi, RenewCertificate, UpdateEpi},
        report::{EquipmentHolders, ExpiredEpi, ExpiringEpi},
    },
};

use super::ReportQuery;

/// List all equipment
#[utoipa::path(
    get,
    path = "/epis",
    tag = "epis",
    responses(
        (status = 200, description = "Equipment list", body = Vec<Epi>)
    )
)]
pub async fn list_epis(State(state): State<crate::AppState>) -> Json<Vec<Epi>> {
    Json(state.services.inventory.list_epis().await)
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/epis/{id}",
    tag = "epis",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Epi),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_epi(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Epi>> {
    let epi = state.services.inventory.get_epi(&id).await?;
    Ok(Json(epi))
}

/// Register equipment
#[utoipa::path(
    post,
    path = "/epis",
    tag = "epis",
    request_body = CreateEpi,
    responses(
        (status = 201, description = "Equipment registered", body = Epi),
        (status = 400, description = "Missing field or invalid date")
    )
)]
pub async fn create_epi(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateEpi>,
) -> AppResult<(StatusCode, Json<Epi>)> {
    let epi = state.services.inventory.create_epi(&data).await?;
    Ok((StatusCode::CREATED, Json(epi)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/epis/{id}",
    tag = "epis",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = UpdateEpi,
    responses(
        (status = 200, description = "Equipment updated", body = Epi),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_epi(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateEpi>,
) -> AppResult<Json<Epi>> {
    let epi = state.services.inventory.update_epi(&id, &data).await?;
    Ok(Json(epi))
}

/// Renew the certificate (CA number and expiration date)
#[utoipa::path(
    put,
    path = "/epis/{id}/ca",
    tag = "epis",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = RenewCertificate,
    responses(
        (status = 200, description = "Certificate renewed", body = Epi),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn renew_certificate(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<RenewCertificate>,
) -> AppResult<Json<Epi>> {
    let epi = state.services.inventory.renew_certificate(&id, &data).await?;
    Ok(Json(epi))
}

/// Delete equipment (assignment links are kept)
#[utoipa::path(
    delete,
    path = "/epis/{id}",
    tag = "epis",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_epi(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete_epi(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Expired equipment, most overdue first
#[utoipa::path(
    get,
    path = "/epis/expired",
    tag = "epis",
    params(ReportQuery),
    responses(
        (status = 200, description = "Expired equipment", body = Vec<ExpiredEpi>)
    )
)]
pub async fn list_expired(
    State(state): State<crate::AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ExpiredEpi>>> {
    let today = query.reference_date()?;
    Ok(Json(state.services.inventory.expired(today).await))
}

/// Equipment expiring within the warning window, soonest first
#[utoipa::path(
    get,
    path = "/epis/expiring",
    tag = "epis",
    params(ReportQuery),
    responses(
        (status = 200, description = "Expiring equipment", body = Vec<ExpiringEpi>)
    )
)]
pub async fn list_expiring(
    State(state): State<crate::AppState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<ExpiringEpi>>> {
    let today = query.reference_date()?;
    Ok(Json(state.services.inventory.expiring(today).await))
}

/// Names of the employees holding a piece of equipment
#[utoipa::path(
    get,
    path = "/epis/{id}/holders",
    tag = "epis",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Holder names", body = EquipmentHolders)
    )
)]
pub async fn get_holders(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Json<EquipmentHolders> {
    Json(state.services.inventory.equipment_holders(&id).await)
}
