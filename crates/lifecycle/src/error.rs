//! Lifecycle error types.

use database::{DatabaseError, SwapStatus, ValidationError};
use thiserror::Error;

/// Errors that can occur in lifecycle operations.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Referenced entity doesn't exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A transition was attempted on a request that is no longer pending.
    #[error("swap request {id} is already {status}")]
    InvalidState { id: i64, status: SwapStatus },

    /// Chat was requested on a swap request that is not accepted.
    #[error("chat is only available for accepted swap requests")]
    ChatUnavailable { id: i64, status: SwapStatus },

    /// Underlying storage failure.
    #[error("database error: {0}")]
    Database(DatabaseError),
}

impl From<DatabaseError> for LifecycleError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => LifecycleError::NotFound { entity, id },
            other => LifecycleError::Database(other),
        }
    }
}

/// Result type for lifecycle operations.
pub type Result<T> = std::result::Result<T, LifecycleError>;
