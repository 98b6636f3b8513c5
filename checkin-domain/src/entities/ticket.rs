// Ticket entity
// One attendee admission for an event, with its check-in audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{Actor, TicketAction, TicketStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub attendee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendee_email: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub check_in_history: Vec<HistoryEntry>,
}

impl Ticket {
    /// Builds a fresh `valid` ticket with a random v4 id and no history.
    pub fn issue(new_ticket: NewTicket, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            attendee_name: new_ticket.attendee_name,
            attendee_email: new_ticket.attendee_email,
            status: TicketStatus::Valid,
            created_at: now,
            check_in_history: Vec::new(),
        }
    }

    pub fn has_email(&self) -> bool {
        self.attendee_email
            .as_deref()
            .map(|email| !email.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: TicketAction,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "scannedBy")]
    pub actor: Actor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    pub attendee_name: String,
    #[serde(default)]
    pub attendee_email: Option<String>,
}

impl NewTicket {
    pub fn normalized(self) -> Self {
        Self {
            attendee_name: self.attendee_name.trim().to_string(),
            attendee_email: normalize_email(self.attendee_email),
        }
    }
}

/// Partial update of the editable ticket fields.
///
/// Absent fields are left alone. An empty email clears the stored one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPatch {
    #[serde(default)]
    pub attendee_name: Option<String>,
    #[serde(default)]
    pub attendee_email: Option<String>,
}

impl TicketPatch {
    pub fn is_empty(&self) -> bool {
        self.attendee_name.is_none() && self.attendee_email.is_none()
    }

    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(name) = &self.attendee_name {
            ticket.attendee_name = name.trim().to_string();
        }
        if let Some(email) = &self.attendee_email {
            ticket.attendee_email = normalize_email(Some(email.clone()));
        }
    }
}

fn normalize_email(value: Option<String>) -> Option<String> {
    value
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty())
}
