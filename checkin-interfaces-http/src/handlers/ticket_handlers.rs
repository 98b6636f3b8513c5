use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use checkin_application::commands::ticket_commands;
use checkin_application::queries::ticket_queries;
use checkin_application::AppState;
use checkin_domain::{Actor, EventStats, NewTicket, Ticket, TicketPatch};

use crate::error::HttpError;
use crate::handlers::event_handlers::MessageResponse;
use crate::middleware::JsonBody;

#[derive(Deserialize)]
pub struct StatusChangePayload {
    pub action: String,
    #[serde(default)]
    pub actor: Option<String>,
}

#[derive(Serialize)]
pub struct TicketResponse {
    pub status: &'static str,
    pub ticket: Ticket,
}

#[derive(Serialize)]
pub struct TicketsResponse {
    pub status: &'static str,
    pub tickets: Vec<Ticket>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub status: &'static str,
    pub stats: EventStats,
}

#[derive(Serialize)]
pub struct StatusChangeData {
    pub ticket: Ticket,
    pub message: String,
}

#[derive(Serialize)]
pub struct StatusChangeResponse {
    pub status: &'static str,
    pub data: StatusChangeData,
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    JsonBody(payload): JsonBody<NewTicket>,
) -> Result<(StatusCode, Json<TicketResponse>), HttpError> {
    let ticket = ticket_commands::create_ticket(&state, &event_id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(TicketResponse {
            status: "success",
            ticket,
        }),
    ))
}

pub async fn update_ticket(
    State(state): State<AppState>,
    Path((event_id, ticket_id)): Path<(String, String)>,
    JsonBody(patch): JsonBody<TicketPatch>,
) -> Result<Json<MessageResponse>, HttpError> {
    let message = ticket_commands::update_fields(&state, &event_id, &ticket_id, patch).await?;
    Ok(Json(MessageResponse::success(message)))
}

pub async fn delete_ticket(
    State(state): State<AppState>,
    Path((event_id, ticket_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, HttpError> {
    let message = ticket_commands::delete_ticket(&state, &event_id, &ticket_id).await?;
    Ok(Json(MessageResponse::success(message)))
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<TicketsResponse>, HttpError> {
    let tickets = ticket_queries::list_tickets(&state, &event_id).await?;
    Ok(Json(TicketsResponse {
        status: "success",
        tickets,
    }))
}

pub async fn list_emailable_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<TicketsResponse>, HttpError> {
    let tickets = ticket_queries::list_emailable_tickets(&state, &event_id).await?;
    Ok(Json(TicketsResponse {
        status: "success",
        tickets,
    }))
}

pub async fn event_stats(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<StatsResponse>, HttpError> {
    let stats = ticket_queries::event_stats(&state, &event_id).await?;
    Ok(Json(StatsResponse {
        status: "success",
        stats,
    }))
}

pub async fn get_ticket(
    State(state): State<AppState>,
    Path((event_id, ticket_id)): Path<(String, String)>,
) -> Result<Json<TicketResponse>, HttpError> {
    let ticket = ticket_queries::get_ticket(&state, &event_id, &ticket_id).await?;
    Ok(Json(TicketResponse {
        status: "success",
        ticket,
    }))
}

/// Admin console status change. Defaults to `admin`; the console may
/// record a manual override as `manual-admin`.
pub async fn update_ticket_status(
    State(state): State<AppState>,
    Path((event_id, ticket_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<StatusChangePayload>,
) -> Result<Json<StatusChangeResponse>, HttpError> {
    let actor = match payload.actor.as_deref().map(Actor::parse) {
        None => Actor::Admin,
        Some(Some(actor @ (Actor::Admin | Actor::ManualAdmin))) => actor,
        Some(_) => {
            return Err(HttpError::Validation(
                "actor must be 'admin' or 'manual-admin'".to_string(),
            ))
        }
    };
    change_status(&state, &event_id, &ticket_id, &payload.action, actor).await
}

pub async fn scanner_update_ticket_status(
    State(state): State<AppState>,
    Path((event_id, ticket_id)): Path<(String, String)>,
    JsonBody(payload): JsonBody<StatusChangePayload>,
) -> Result<Json<StatusChangeResponse>, HttpError> {
    change_status(&state, &event_id, &ticket_id, &payload.action, Actor::QrScanner).await
}

async fn change_status(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
    action: &str,
    actor: Actor,
) -> Result<Json<StatusChangeResponse>, HttpError> {
    let transition = ticket_commands::change_status(state, event_id, ticket_id, action, actor).await?;
    Ok(Json(StatusChangeResponse {
        status: "success",
        data: StatusChangeData {
            ticket: transition.ticket,
            message: transition.message,
        },
    }))
}
