use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entities::{HistoryEntry, Ticket};
use crate::value_objects::{Actor, TicketAction, TicketStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Ticket already checked in.")]
    AlreadyCheckedIn,
    #[error("Ticket cannot be checked in from status '{0}'.")]
    CannotCheckIn(String),
    #[error("Can only check out an already checked-in ticket.")]
    NotCheckedIn,
    #[error("Invalid action '{0}'. Expected 'check-in' or 'check-out'.")]
    InvalidAction(String),
}

#[derive(Debug, Clone)]
pub struct Transition {
    pub ticket: Ticket,
    pub message: String,
}

/// Check-in / check-out lifecycle of a ticket.
///
/// `valid -> checked-in -> on-leave -> checked-in -> ...`
///
/// Every successful transition appends exactly one history entry. A failed
/// one leaves the input record untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct TicketStatusMachine;

impl TicketStatusMachine {
    pub fn next_status(
        current: &TicketStatus,
        action: TicketAction,
    ) -> Result<TicketStatus, TransitionError> {
        match (action, current) {
            (TicketAction::CheckIn, TicketStatus::Valid | TicketStatus::OnLeave) => {
                Ok(TicketStatus::CheckedIn)
            }
            (TicketAction::CheckIn, TicketStatus::CheckedIn) => {
                Err(TransitionError::AlreadyCheckedIn)
            }
            (TicketAction::CheckIn, other) => {
                Err(TransitionError::CannotCheckIn(other.as_str().to_string()))
            }
            (TicketAction::CheckOut, TicketStatus::CheckedIn) => Ok(TicketStatus::OnLeave),
            (TicketAction::CheckOut, _) => Err(TransitionError::NotCheckedIn),
        }
    }

    pub fn apply(
        ticket: &Ticket,
        action: &str,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<Transition, TransitionError> {
        let action = TicketAction::parse(action)
            .ok_or_else(|| TransitionError::InvalidAction(action.to_string()))?;
        let status = Self::next_status(&ticket.status, action)?;

        let mut updated = ticket.clone();
        updated.status = status;
        updated.check_in_history.push(HistoryEntry {
            action,
            timestamp: now,
            actor,
        });

        let message = match action {
            TicketAction::CheckIn => format!("Checked In: {}", updated.attendee_name),
            TicketAction::CheckOut => format!("On Leave: {}", updated.attendee_name),
        };
        Ok(Transition {
            ticket: updated,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::NewTicket;

    fn ticket_with_status(status: TicketStatus) -> Ticket {
        let mut ticket = Ticket::issue(
            NewTicket {
                attendee_name: "Ada".to_string(),
                attendee_email: None,
            },
            Utc::now(),
        );
        ticket.status = status;
        ticket
    }

    #[test]
    fn check_in_from_valid_and_on_leave() {
        for start in [TicketStatus::Valid, TicketStatus::OnLeave] {
            let ticket = ticket_with_status(start);
            let transition = TicketStatusMachine::apply(&ticket, "check-in", Actor::Admin, Utc::now())
                .expect("check in");
            assert_eq!(transition.ticket.status, TicketStatus::CheckedIn);
            assert_eq!(transition.ticket.check_in_history.len(), 1);
            assert_eq!(transition.ticket.check_in_history[0].action, TicketAction::CheckIn);
            assert_eq!(transition.message, "Checked In: Ada");
        }
    }

    #[test]
    fn double_check_in_is_rejected_without_mutation() {
        let ticket = ticket_with_status(TicketStatus::CheckedIn);
        let err = TicketStatusMachine::apply(&ticket, "check-in", Actor::QrScanner, Utc::now())
            .expect_err("reject");
        assert_eq!(err, TransitionError::AlreadyCheckedIn);
        assert_eq!(ticket.status, TicketStatus::CheckedIn);
        assert!(ticket.check_in_history.is_empty());
    }

    #[test]
    fn check_in_from_unrecognized_status_fails() {
        let ticket = ticket_with_status(TicketStatus::Unrecognized("revoked".to_string()));
        let err = TicketStatusMachine::apply(&ticket, "check-in", Actor::Admin, Utc::now())
            .expect_err("reject");
        assert_eq!(err, TransitionError::CannotCheckIn("revoked".to_string()));
    }

    #[test]
    fn check_out_requires_checked_in() {
        let ticket = ticket_with_status(TicketStatus::CheckedIn);
        let transition = TicketStatusMachine::apply(&ticket, "check-out", Actor::QrScanner, Utc::now())
            .expect("check out");
        assert_eq!(transition.ticket.status, TicketStatus::OnLeave);
        assert_eq!(transition.message, "On Leave: Ada");
        assert_eq!(transition.ticket.check_in_history[0].actor, Actor::QrScanner);

        for start in [
            TicketStatus::Valid,
            TicketStatus::OnLeave,
            TicketStatus::Unrecognized("void".to_string()),
        ] {
            let err = TicketStatusMachine::apply(&ticket_with_status(start), "check-out", Actor::Admin, Utc::now())
                .expect_err("reject");
            assert_eq!(err, TransitionError::NotCheckedIn);
        }
    }

    #[test]
    fn unknown_action_is_rejected() {
        let ticket = ticket_with_status(TicketStatus::Valid);
        let err = TicketStatusMachine::apply(&ticket, "teleport", Actor::Admin, Utc::now())
            .expect_err("reject");
        assert_eq!(err, TransitionError::InvalidAction("teleport".to_string()));
    }

    #[test]
    fn history_keeps_order_across_failed_attempts() {
        let mut ticket = ticket_with_status(TicketStatus::Valid);
        let script = ["check-in", "check-in", "check-out", "check-out", "check-in"];
        let mut applied = Vec::new();
        for action in script {
            if let Ok(transition) = TicketStatusMachine::apply(&ticket, action, Actor::Admin, Utc::now()) {
                ticket = transition.ticket;
                applied.push(TicketAction::parse(action).expect("known action"));
            }
        }
        let recorded: Vec<TicketAction> = ticket.check_in_history.iter().map(|e| e.action).collect();
        assert_eq!(recorded, applied);
        assert_eq!(
            recorded,
            vec![TicketAction::CheckIn, TicketAction::CheckOut, TicketAction::CheckIn]
        );
        assert_eq!(ticket.status, TicketStatus::CheckedIn);
    }
}
