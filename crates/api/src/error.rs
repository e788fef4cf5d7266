//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use lifecycle::LifecycleError;
use thiserror::Error;

/// Errors that can occur while handling an API request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Lifecycle operation failed.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Direct storage read/write failed.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// Input validation failed at the handler boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Malformed request payload.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// HTTP status and client-visible message for this error.
    ///
    /// Storage/infrastructure failures become an opaque 500; the real
    /// error is logged, never echoed to the client.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Lifecycle(err) => match err {
                LifecycleError::Validation(v) => (StatusCode::BAD_REQUEST, v.to_string()),
                LifecycleError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                LifecycleError::InvalidState { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                LifecycleError::ChatUnavailable { .. } => {
                    (StatusCode::BAD_REQUEST, err.to_string())
                }
                LifecycleError::Database(db_err) => {
                    tracing::error!("Database error: {}", db_err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            ApiError::Database(err) => match err {
                DatabaseError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
                DatabaseError::AlreadyExists { .. } => (StatusCode::CONFLICT, err.to_string()),
                other => {
                    tracing::error!("Database error: {}", other);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use database::SwapStatus;

    #[test]
    fn test_validation_maps_to_400() {
        let err = ApiError::Lifecycle(LifecycleError::Validation(ValidationError::Empty(
            "offered_skill".to_string(),
        )));
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::Lifecycle(LifecycleError::NotFound {
            entity: "SwapRequest",
            id: "7".to_string(),
        });
        assert_eq!(err.status_and_message().0, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_chat_gate_maps_to_400_with_explanation() {
        let err = ApiError::Lifecycle(LifecycleError::ChatUnavailable {
            id: 7,
            status: SwapStatus::Pending,
        });
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("accepted swap requests"));
    }

    #[test]
    fn test_invalid_state_maps_to_400() {
        let err = ApiError::Lifecycle(LifecycleError::InvalidState {
            id: 7,
            status: SwapStatus::Accepted,
        });
        assert_eq!(err.status_and_message().0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_failure_is_opaque_500() {
        let err = ApiError::Database(DatabaseError::Sqlx(sqlx::Error::PoolClosed));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "internal error");
    }
}
