// Ticket action value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketAction {
    CheckIn,
    CheckOut,
}

impl TicketAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketAction::CheckIn => "check-in",
            TicketAction::CheckOut => "check-out",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "check-in" => Some(TicketAction::CheckIn),
            "check-out" => Some(TicketAction::CheckOut),
            _ => None,
        }
    }
}
