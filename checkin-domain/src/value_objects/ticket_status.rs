// Ticket status value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a ticket.
///
/// Stored documents may carry a status string this service never writes;
/// it is kept verbatim as `Unrecognized` so it round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Valid,
    CheckedIn,
    OnLeave,
    Unrecognized(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Valid => "valid",
            TicketStatus::CheckedIn => "checked-in",
            TicketStatus::OnLeave => "on-leave",
            TicketStatus::Unrecognized(raw) => raw.as_str(),
        }
    }
}

impl Default for TicketStatus {
    fn default() -> Self {
        TicketStatus::Valid
    }
}

impl From<&str> for TicketStatus {
    fn from(s: &str) -> Self {
        match s {
            "valid" => TicketStatus::Valid,
            "checked-in" => TicketStatus::CheckedIn,
            "on-leave" => TicketStatus::OnLeave,
            other => TicketStatus::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for TicketStatus {
    fn from(s: String) -> Self {
        TicketStatus::from(s.as_str())
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        match status {
            TicketStatus::Unrecognized(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
