//! Unified error handling for the HTTP surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::store::StoreError;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Required input missing from the request.
    #[error("{0}")]
    Validation(String),

    /// The referenced todo (or route) does not exist.
    #[error("{0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(msg) => AppError::Validation(msg.to_string()),
            StoreError::NotFound(_) => AppError::NotFound("Todo not found".to_string()),
            other => AppError::Storage(other),
        }
    }
}

/// Body of every error response, and of the delete confirmation.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Storage(err) => {
                tracing::error!("storage error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(MessageBody::new(message))).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (
                AppError::from(StoreError::Validation("Todo text is required")),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(StoreError::NotFound(Uuid::nil())),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(StoreError::Io(std::io::Error::other("disk full"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn not_found_hides_the_id() {
        let err = AppError::from(StoreError::NotFound(Uuid::nil()));
        assert_eq!(err.to_string(), "Todo not found");
    }
}
