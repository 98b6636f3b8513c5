use checkin_domain::{EventStats, Ticket};

use crate::validation::validate_identifier;
use crate::{AppError, AppState};

pub async fn list_tickets(state: &AppState, event_id: &str) -> Result<Vec<Ticket>, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let mut tickets = state.cache.list_all(&event_id).await?;
    tickets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Ok(tickets)
}

pub async fn get_ticket(state: &AppState, event_id: &str, ticket_id: &str) -> Result<Ticket, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let ticket_id = validate_identifier("ticket id", ticket_id)?;
    state.cache.ensure_loaded(&event_id).await?;
    state
        .cache
        .get(&event_id, &ticket_id)
        .await
        .ok_or_else(AppError::ticket_not_found)
}

pub async fn event_stats(state: &AppState, event_id: &str) -> Result<EventStats, AppError> {
    let tickets = list_tickets(state, event_id).await?;
    Ok(EventStats::from_tickets(&tickets))
}

/// Tickets that can receive mail.
pub async fn list_emailable_tickets(state: &AppState, event_id: &str) -> Result<Vec<Ticket>, AppError> {
    let tickets = list_tickets(state, event_id).await?;
    Ok(tickets.into_iter().filter(Ticket::has_email).collect())
}
