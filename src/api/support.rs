//! Support ticket and chat endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use tokio_stream::{Stream, StreamExt};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::support::{
        CreateMessage, CreateTicket, SupportMessage, SupportTicket, TicketQuery, UpdateTicketStatus,
    },
    services::realtime::Subscription,
};

use super::AuthenticatedUser;

fn event_stream(subscription: Subscription) -> impl Stream<Item = Result<Event, axum::Error>> {
    subscription
        .into_stream()
        .map(|event| Event::default().event(event.kind()).json_data(&event))
}

/// Open a support ticket
#[utoipa::path(
    post,
    path = "/support/tickets",
    tag = "support",
    security(("bearer_auth" = [])),
    request_body = CreateTicket,
    responses(
        (status = 201, description = "Ticket opened", body = SupportTicket),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateTicket>,
) -> AppResult<(StatusCode, Json<SupportTicket>)> {
    let ticket = state.services.support.open_ticket(&claims, &data).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// List tickets, newest first (administrators)
#[utoipa::path(
    get,
    path = "/support/tickets",
    tag = "support",
    security(("bearer_auth" = [])),
    params(TicketQuery),
    responses(
        (status = 200, description = "Tickets", body = Vec<SupportTicket>),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn list_tickets(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<TicketQuery>,
) -> AppResult<Json<Vec<SupportTicket>>> {
    let tickets = state.services.support.list_tickets(&claims, &query).await?;
    Ok(Json(tickets))
}

/// Get a ticket (owner or administrator)
#[utoipa::path(
    get,
    path = "/support/tickets/{id}",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Ticket", body = SupportTicket),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn get_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SupportTicket>> {
    let ticket = state.services.support.get_ticket(&claims, id).await?;
    Ok(Json(ticket))
}

/// Set a ticket's status (administrators)
#[utoipa::path(
    put,
    path = "/support/tickets/{id}/status",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = UpdateTicketStatus,
    responses(
        (status = 200, description = "Status updated", body = SupportTicket),
        (status = 403, description = "Not an administrator"),
        (status = 404, description = "Ticket not found")
    )
)]
pub async fn update_ticket_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTicketStatus>,
) -> AppResult<Json<SupportTicket>> {
    let ticket = state.services.support.update_status(&claims, id, data.status).await?;
    Ok(Json(ticket))
}

/// Move a ticket along open → in progress → closed → open (administrators)
#[utoipa::path(
    post,
    path = "/support/tickets/{id}/advance",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Status advanced", body = SupportTicket),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn advance_ticket(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SupportTicket>> {
    let ticket = state.services.support.advance_status(&claims, id).await?;
    Ok(Json(ticket))
}

/// Messages of a ticket, oldest first
#[utoipa::path(
    get,
    path = "/support/tickets/{id}/messages",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "Messages", body = Vec<SupportMessage>)
    )
)]
pub async fn list_messages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<SupportMessage>>> {
    let messages = state.services.support.list_messages(&claims, id).await?;
    Ok(Json(messages))
}

/// Post a chat message on a ticket
#[utoipa::path(
    post,
    path = "/support/tickets/{id}/messages",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    request_body = CreateMessage,
    responses(
        (status = 201, description = "Message sent", body = SupportMessage),
        (status = 400, description = "Empty message")
    )
)]
pub async fn post_message(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<SupportMessage>)> {
    let message = state.services.support.post_message(&claims, id, &data).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// Server-sent events for new messages on a ticket
#[utoipa::path(
    get,
    path = "/support/tickets/{id}/messages/events",
    tag = "support",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Ticket ID")),
    responses(
        (status = 200, description = "text/event-stream of `message` events")
    )
)]
pub async fn message_events(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let subscription = state.services.support.subscribe_messages(&claims, id).await?;
    Ok(Sse::new(event_stream(subscription)).keep_alive(KeepAlive::default()))
}

/// Server-sent events for ticket changes (administrators)
#[utoipa::path(
    get,
    path = "/support/tickets/events",
    tag = "support",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "text/event-stream of `ticket` events"),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn ticket_events(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let subscription = state.services.support.subscribe_tickets(&claims).await?;
    Ok(Sse::new(event_stream(subscription)).keep_alive(KeepAlive::default()))
}
