use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use checkin_application::commands::event_commands;
use checkin_application::queries::event_queries;
use checkin_application::AppState;
use checkin_domain::Event;

use crate::error::HttpError;
use crate::middleware::JsonBody;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    pub event_id: String,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub status: &'static str,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct EventResponse {
    pub status: &'static str,
    pub event: Event,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
        }
    }
}

pub async fn list_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, HttpError> {
    let events = event_queries::list_events(&state).await?;
    Ok(Json(EventsResponse {
        status: "success",
        events,
    }))
}

pub async fn create_event(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEventPayload>,
) -> Result<(StatusCode, Json<EventResponse>), HttpError> {
    let event = event_commands::create_event(&state, &payload.event_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(EventResponse {
            status: "success",
            event,
        }),
    ))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<MessageResponse>, HttpError> {
    event_commands::delete_event(&state, &event_id).await?;
    Ok(Json(MessageResponse::success("Event deleted successfully.")))
}
