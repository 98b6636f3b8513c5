use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use checkin_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    Validation(String),
    InvalidTransition(String),
    NotFound(String),
    Internal(String),
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::NotFound(msg) => HttpError::NotFound(msg),
            AppError::Validation(msg) => HttpError::Validation(msg),
            AppError::InvalidTransition(err) => HttpError::InvalidTransition(err.to_string()),
            AppError::Persistence(err) => {
                error!("request failed on store access: {:#}", err);
                HttpError::Internal("storage is unavailable, try again".to_string())
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    kind: &'static str,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            HttpError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            HttpError::InvalidTransition(msg) => (StatusCode::BAD_REQUEST, "invalid_transition", msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence", msg),
        };
        (
            status,
            Json(ErrorBody {
                status: "error",
                kind,
                message,
            }),
        )
            .into_response()
    }
}
