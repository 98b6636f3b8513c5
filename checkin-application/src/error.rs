use checkin_domain::TransitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("{0}")]
    Validation(String),
    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::Validation(_) => "validation",
            AppError::Persistence(_) => "persistence",
        }
    }

    pub fn ticket_not_found() -> Self {
        AppError::NotFound("Ticket not found.".to_string())
    }
}
