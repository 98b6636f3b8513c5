use checkin_domain::Event;
use chrono::Utc;
use tracing::info;

use crate::validation::{validate_identifier, validate_new_event_id};
use crate::{AppError, AppState};

pub async fn create_event(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    let event_id = validate_new_event_id(event_id)?;
    let gate = state.locks.share_event(&event_id).await;
    let result = ensure_event_meta(state, &event_id).await;
    state.locks.release_event(gate).await;
    result
}

/// Returns the stored metadata, writing a fresh record only when none exists.
pub async fn ensure_event_meta(state: &AppState, event_id: &str) -> Result<Event, AppError> {
    let existing = state
        .store
        .get_event_meta(event_id)
        .await
        .map_err(AppError::Persistence)?;
    if let Some(event) = existing {
        return Ok(event);
    }
    let event = Event::new(event_id, Utc::now());
    state
        .store
        .set_event_meta(&event)
        .await
        .map_err(AppError::Persistence)?;
    info!("created event {}", event_id);
    Ok(event)
}

/// Removes the event metadata, every ticket document and the event
/// document, then evicts the cache partition.
///
/// Holds the event exclusively throughout, so no ticket of this event is
/// created or changed mid-cascade. Queued ticket writes are drained first so
/// none of them lands after the tickets are gone.
pub async fn delete_event(state: &AppState, event_id: &str) -> Result<(), AppError> {
    let event_id = validate_identifier("event id", event_id)?;
    let gate = state.locks.exclusive_event(&event_id).await;
    let result = purge_event(state, &event_id).await;
    state.locks.release_event(gate).await;
    result
}

async fn purge_event(state: &AppState, event_id: &str) -> Result<(), AppError> {
    state.write_behind.flush().await;

    state
        .store
        .delete_event_meta(event_id)
        .await
        .map_err(AppError::Persistence)?;
    let removed = state
        .store
        .batch_delete_tickets(event_id)
        .await
        .map_err(AppError::Persistence)?;
    state
        .store
        .delete_event_document(event_id)
        .await
        .map_err(AppError::Persistence)?;

    state.cache.drop_partition(event_id).await;
    info!("deleted event {} with {} tickets", event_id, removed);
    Ok(())
}
