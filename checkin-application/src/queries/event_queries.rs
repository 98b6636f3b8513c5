use checkin_domain::Event;
use chrono::Utc;
use tracing::{info, warn};

use crate::{AppError, AppState};

/// All events by creation time.
///
/// When no metadata exists yet, event ids are discovered from the stored
/// event documents and metadata is backfilled for each of them.
pub async fn list_events(state: &AppState) -> Result<Vec<Event>, AppError> {
    let mut events = state
        .store
        .list_event_meta()
        .await
        .map_err(AppError::Persistence)?;
    if events.is_empty() {
        events = backfill_event_meta(state).await;
    }
    events.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(events)
}

async fn backfill_event_meta(state: &AppState) -> Vec<Event> {
    let event_ids = match state.store.list_event_ids().await {
        Ok(ids) => ids,
        Err(err) => {
            warn!("event discovery failed: {:#}", err);
            return Vec::new();
        }
    };
    let mut events = Vec::with_capacity(event_ids.len());
    for event_id in event_ids {
        let event = Event::new(&event_id, Utc::now());
        if let Err(err) = state.store.set_event_meta(&event).await {
            warn!("metadata backfill failed for event {}: {:#}", event_id, err);
        }
        events.push(event);
    }
    if !events.is_empty() {
        info!("backfilled metadata for {} events", events.len());
    }
    events
}
