// Event entity
// Event metadata plus aggregate views over its tickets

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Ticket;
use crate::value_objects::TicketStatus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(id: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub total: usize,
    pub valid: usize,
    pub checked_in: usize,
    pub on_leave: usize,
    pub other: usize,
}

impl EventStats {
    pub fn from_tickets<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        let mut stats = EventStats::default();
        for ticket in tickets {
            stats.total += 1;
            match ticket.status {
                TicketStatus::Valid => stats.valid += 1,
                TicketStatus::CheckedIn => stats.checked_in += 1,
                TicketStatus::OnLeave => stats.on_leave += 1,
                TicketStatus::Unrecognized(_) => stats.other += 1,
            }
        }
        stats
    }
}
