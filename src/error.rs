use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, TransactionError};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Business-rule and infrastructure errors surfaced by handlers and services.
#[derive(Debug, Error)]
pub enum AppError {
    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// State conflict: seat already taken, duplicate ticket, schedule overlap.
    #[error("{0}")]
    Conflict(String),

    /// Malformed or out-of-range field values.
    #[error("{0}")]
    Validation(String),

    /// Operation requires a state the entity is not in
    /// (e.g. issuing a ticket from a non-confirmed reservation).
    #[error("{0}")]
    Precondition(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Validation(msg) | AppError::Precondition(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<TransactionError<AppError>> for AppError {
    fn from(err: TransactionError<AppError>) -> Self {
        match err {
            TransactionError::Connection(e) => AppError::Database(e),
            TransactionError::Transaction(e) => e,
        }
    }
}
