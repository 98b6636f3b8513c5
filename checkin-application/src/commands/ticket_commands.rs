use checkin_domain::{Actor, NewTicket, Ticket, TicketPatch, TicketStatusMachine, Transition};
use chrono::Utc;
use tracing::{info, warn};

use crate::commands::event_commands::ensure_event_meta;
use crate::ops::StoreWrite;
use crate::validation::{validate_identifier, validate_new_ticket, validate_patch};
use crate::{AppError, AppState};

pub const TICKET_UPDATED_MESSAGE: &str = "Ticket updated successfully.";
pub const TICKET_DELETED_MESSAGE: &str = "Ticket deleted successfully.";

pub async fn create_ticket(
    state: &AppState,
    event_id: &str,
    new_ticket: NewTicket,
) -> Result<Ticket, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let new_ticket = validate_new_ticket(new_ticket)?;
    let gate = state.locks.share_event(&event_id).await;
    let result = issue_ticket(state, &event_id, new_ticket).await;
    state.locks.release_event(gate).await;
    result
}

async fn issue_ticket(
    state: &AppState,
    event_id: &str,
    new_ticket: NewTicket,
) -> Result<Ticket, AppError> {
    ensure_event_meta(state, event_id).await?;
    state.cache.ensure_loaded(event_id).await?;

    let ticket = Ticket::issue(new_ticket, Utc::now());
    state.cache.put(event_id, ticket.clone()).await;
    state.write_behind.submit(StoreWrite::PutTicket {
        event_id: event_id.to_string(),
        ticket: ticket.clone(),
    });
    Ok(ticket)
}

/// Applies a check-in or check-out to one ticket.
///
/// The whole read-modify-write runs under the ticket's lock. A ticket the
/// loaded partition does not know is read from the store once and cached.
pub async fn change_status(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
    action: &str,
    actor: Actor,
) -> Result<Transition, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let ticket_id = validate_identifier("ticket id", ticket_id)?;
    let guard = state.locks.acquire(&event_id, &ticket_id).await;
    let result = apply_action(state, &event_id, &ticket_id, action, actor).await;
    state.locks.release(guard).await;
    result
}

async fn apply_action(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
    action: &str,
    actor: Actor,
) -> Result<Transition, AppError> {
    state.cache.ensure_loaded(event_id).await?;
    let current = match state.cache.get(event_id, ticket_id).await {
        Some(ticket) => ticket,
        None => read_through(state, event_id, ticket_id).await?,
    };

    let transition = match TicketStatusMachine::apply(&current, action, actor, Utc::now()) {
        Ok(transition) => transition,
        Err(err) => {
            state.metrics.record_rejected_transition();
            return Err(err.into());
        }
    };

    state.cache.put(event_id, transition.ticket.clone()).await;
    state.write_behind.submit(StoreWrite::PutTicket {
        event_id: event_id.to_string(),
        ticket: transition.ticket.clone(),
    });
    state.metrics.record_status_change();
    info!(
        "ticket {}/{} is now {} ({})",
        event_id,
        ticket_id,
        transition.ticket.status,
        actor.as_str()
    );
    Ok(transition)
}

pub async fn update_fields(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
    patch: TicketPatch,
) -> Result<String, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let ticket_id = validate_identifier("ticket id", ticket_id)?;
    validate_patch(&patch)?;
    let guard = state.locks.acquire(&event_id, &ticket_id).await;
    let result = apply_patch(state, &event_id, &ticket_id, patch).await;
    state.locks.release(guard).await;
    result.map(|()| TICKET_UPDATED_MESSAGE.to_string())
}

async fn apply_patch(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
    patch: TicketPatch,
) -> Result<(), AppError> {
    state.cache.ensure_loaded(event_id).await?;
    let mut ticket = state
        .cache
        .get(event_id, ticket_id)
        .await
        .ok_or_else(AppError::ticket_not_found)?;
    patch.apply_to(&mut ticket);

    state.cache.put(event_id, ticket.clone()).await;
    state.write_behind.submit(StoreWrite::PutTicket {
        event_id: event_id.to_string(),
        ticket,
    });
    Ok(())
}

pub async fn delete_ticket(
    state: &AppState,
    event_id: &str,
    ticket_id: &str,
) -> Result<String, AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let ticket_id = validate_identifier("ticket id", ticket_id)?;
    let guard = state.locks.acquire(&event_id, &ticket_id).await;
    let result = remove_ticket(state, &event_id, &ticket_id).await;
    state.locks.release(guard).await;
    result.map(|()| TICKET_DELETED_MESSAGE.to_string())
}

async fn remove_ticket(state: &AppState, event_id: &str, ticket_id: &str) -> Result<(), AppError> {
    state.cache.ensure_loaded(event_id).await?;
    if state.cache.remove(event_id, ticket_id).await.is_none() {
        return Err(AppError::ticket_not_found());
    }
    state.write_behind.submit(StoreWrite::DeleteTicket {
        event_id: event_id.to_string(),
        ticket_id: ticket_id.to_string(),
    });
    Ok(())
}

// Queued writes are drained before the read so a ticket deleted through
// this process cannot come back from a store that has not caught up yet.
async fn read_through(state: &AppState, event_id: &str, ticket_id: &str) -> Result<Ticket, AppError> {
    state.write_behind.flush().await;
    state.metrics.record_fallback_read();
    let ticket = state
        .store
        .get_ticket(event_id, ticket_id)
        .await
        .map_err(AppError::Persistence)?
        .ok_or_else(AppError::ticket_not_found)?;
    warn!(
        "ticket {} was missing from cached event {}, read from store",
        ticket_id, event_id
    );
    state.cache.put(event_id, ticket.clone()).await;
    Ok(ticket)
}
