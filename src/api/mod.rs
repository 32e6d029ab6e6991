//! API handlers for EPI Control REST endpoints

pub mod assignments;
pub mod employees;
pub mod epis;
pub mod health;
pub mod openapi;
pub mod support;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    inventory::expiration::parse_iso_date,
    models::UserClaims,
    services::inventory::InventoryService,
    AppState,
};

/// Extractor for the authenticated user from the auth provider's JWT
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Reference date for expiration reports
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Evaluate as of this date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

impl ReportQuery {
    pub fn reference_date(&self) -> AppResult<NaiveDate> {
        match self.date.as_deref() {
            Some(date) => parse_iso_date(date),
            None => Ok(InventoryService::today()),
        }
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Equipment
        .route("/epis", get(epis::list_epis).post(epis::create_epi))
        .route("/epis/expired", get(epis::list_expired))
        .route("/epis/expiring", get(epis::list_expiring))
        .route(
            "/epis/:id",
            get(epis::get_epi).put(epis::update_epi).delete(epis::delete_epi),
        )
        .route("/epis/:id/ca", put(epis::renew_certificate))
        .route("/epis/:id/holders", get(epis::get_holders))
        // Employees
        .route("/employees", get(employees::list_employees).post(employees::create_employee))
        .route("/employees/holdings", get(employees::list_holdings))
        .route(
            "/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route("/employees/:id/epis", get(employees::get_holdings))
        // Assignments
        .route(
            "/assignments",
            get(assignments::list_assignments).post(assignments::create_assignment),
        )
        .route("/assignments/:id", axum::routing::delete(assignments::delete_assignment))
        // Support
        .route("/support/tickets", get(support::list_tickets).post(support::create_ticket))
        .route("/support/tickets/events", get(support::ticket_events))
        .route("/support/tickets/:id", get(support::get_ticket))
        .route("/support/tickets/:id/status", put(support::update_ticket_status))
        .route("/support/tickets/:id/advance", post(support::advance_ticket))
        .route(
            "/support/tickets/:id/messages",
            get(support::list_messages).post(support::post_message),
        )
        .route("/support/tickets/:id/messages/events", get(support::message_events))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
