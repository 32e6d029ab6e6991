//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assignments, employees, epis, health, support};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EPI Control API",
        version = "0.3.0",
        description = "Personal protective equipment tracking and support desk REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Equipment
        epis::list_epis,
        epis::get_epi,
        epis::create_epi,
        epis::update_epi,
        epis::renew_certificate,
        epis::delete_epi,
        epis::list_expired,
        epis::list_expiring,
        epis::get_holders,
        // Employees
        employees::list_employees,
        employees::get_employee,
        employees::create_employee,
        employees::update_employee,
        employees::delete_employee,
        employees::get_holdings,
        employees::list_holdings,
        // Assignments
        assignments::list_assignments,
        assignments::create_assignment,
        assignments::delete_assignment,
        // Support
        support::create_ticket,
        support::list_tickets,
        support::get_ticket,
        support::update_ticket_status,
        support::advance_ticket,
        support::list_messages,
        support::post_message,
        support::message_events,
        support::ticket_events,
    ),
    components(
        schemas(
            // Equipment
            crate::models::epi::Epi,
            crate::models::epi::CreateEpi,
            crate::models::epi::UpdateEpi,
            crate::models::epi::RenewCertificate,
            // Employees
            crate::models::employee::Employee,
            crate::models::employee::CreateEmployee,
            crate::models::employee::UpdateEmployee,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::assignment::CreateAssignment,
            // Reports
            crate::models::report::ExpiredEpi,
            crate::models::report::ExpiringEpi,
            crate::models::report::HeldEpi,
            crate::models::report::EmployeeHoldings,
            crate::models::report::EquipmentHolders,
            // Support
            crate::models::support::TicketStatus,
            crate::models::support::SupportTicket,
            crate::models::support::SupportMessage,
            crate::models::support::CreateTicket,
            crate::models::support::UpdateTicketStatus,
            crate::models::support::CreateMessage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "epis", description = "Protective equipment and expiration reports"),
        (name = "employees", description = "Employee management"),
        (name = "assignments", description = "Equipment delivered to employees"),
        (name = "support", description = "Support tickets and chat")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
