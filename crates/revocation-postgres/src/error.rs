//! Error types for the PostgreSQL storage backend.

use revocation_auth::AuthError;
use revocation_storage::StorageError;

/// Errors that can occur during PostgreSQL storage operations.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx_core::Error),

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored value is outside its allowed range.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl PostgresError {
    /// Create an `InvalidData` error.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData(message.into())
    }

    /// Returns `true` if the database could not be reached.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Database(
                sqlx_core::Error::Io(_)
                    | sqlx_core::Error::Tls(_)
                    | sqlx_core::Error::PoolTimedOut
                    | sqlx_core::Error::PoolClosed
            )
        )
    }
}

/// Result type for PostgreSQL storage operations.
pub type Result<T> = std::result::Result<T, PostgresError>;

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        if err.is_connection_error() {
            StorageError::connection(err.to_string())
        } else {
            StorageError::backend(err.to_string())
        }
    }
}

impl From<PostgresError> for AuthError {
    fn from(err: PostgresError) -> Self {
        AuthError::storage(err.to_string())
    }
}
