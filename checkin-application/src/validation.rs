use checkin_domain::{is_safe_identifier, NewTicket, TicketPatch, MIN_EVENT_ID_LEN};

use crate::AppError;

pub fn validate_identifier(label: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", label)));
    }
    if !is_safe_identifier(trimmed) {
        return Err(AppError::Validation(format!(
            "invalid {} '{}': use letters, digits, '-', '_' or '.'",
            label, trimmed
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_new_event_id(value: &str) -> Result<String, AppError> {
    let event_id = validate_identifier("event id", value)?;
    if event_id.chars().count() < MIN_EVENT_ID_LEN {
        return Err(AppError::Validation(format!(
            "event id must be at least {} characters",
            MIN_EVENT_ID_LEN
        )));
    }
    Ok(event_id)
}

pub fn validate_new_ticket(new_ticket: NewTicket) -> Result<NewTicket, AppError> {
    let new_ticket = new_ticket.normalized();
    if new_ticket.attendee_name.is_empty() {
        return Err(AppError::Validation("attendeeName is required".to_string()));
    }
    if let Some(email) = &new_ticket.attendee_email {
        validate_email(email)?;
    }
    Ok(new_ticket)
}

pub fn validate_patch(patch: &TicketPatch) -> Result<(), AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation("no fields to update".to_string()));
    }
    if let Some(name) = &patch.attendee_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("attendeeName must not be empty".to_string()));
        }
    }
    if let Some(email) = &patch.attendee_email {
        let email = email.trim();
        if !email.is_empty() {
            validate_email(email)?;
        }
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation(format!("invalid attendeeEmail '{}'", email));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let mut labels = domain.split('.');
    let well_formed = domain.contains('.') && labels.all(|label| !label.is_empty());
    if !well_formed {
        return Err(invalid());
    }
    Ok(())
}
