//! Storage error types for the revocation storage layer.

use std::fmt;

use revocation_core::EpochMillis;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The query reaches further back than the configured maximum.
    #[error("Query range too large: from {from} is more than {max_time_delta}ms before {now}")]
    RangeTooLarge {
        /// Requested lower bound.
        from: EpochMillis,
        /// Time the query was evaluated at.
        now: EpochMillis,
        /// Maximum accepted `now - from`.
        max_time_delta: EpochMillis,
    },

    /// The query bound cannot be mapped to buckets.
    #[error("Invalid range: {message}")]
    InvalidRange {
        /// Description of why the bound is unusable.
        message: String,
    },

    /// The revocation cannot be placed in a bucket.
    #[error("Invalid revocation: {message}")]
    InvalidRevocation {
        /// Description of why the revocation is invalid.
        message: String,
    },

    /// The revocation payload could not be serialized. Nothing was written.
    #[error("Encode error: {message}")]
    Encode {
        /// Description of the encode failure.
        message: String,
    },

    /// The backing store rejected or failed an operation.
    #[error("Backend error: {message}")]
    Backend {
        /// Description of the backend error.
        message: String,
    },

    /// Failed to connect to the backing store.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// An internal storage error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `RangeTooLarge` error.
    #[must_use]
    pub fn range_too_large(from: EpochMillis, now: EpochMillis, max_time_delta: EpochMillis) -> Self {
        Self::RangeTooLarge {
            from,
            now,
            max_time_delta,
        }
    }

    /// Creates a new `InvalidRange` error.
    #[must_use]
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRevocation` error.
    #[must_use]
    pub fn invalid_revocation(message: impl Into<String>) -> Self {
        Self::InvalidRevocation {
            message: message.into(),
        }
    }

    /// Creates a new `Encode` error.
    #[must_use]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// Creates a new `Backend` error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Creates a new `Connection` error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a range too large error.
    #[must_use]
    pub fn is_range_too_large(&self) -> bool {
        matches!(self, Self::RangeTooLarge { .. })
    }

    /// Returns `true` if this is an encode error.
    #[must_use]
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::Encode { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RangeTooLarge { .. } => ErrorCategory::Validation,
            Self::InvalidRange { .. } => ErrorCategory::Validation,
            Self::InvalidRevocation { .. } => ErrorCategory::Validation,
            Self::Encode { .. } => ErrorCategory::Serialization,
            Self::Backend { .. } => ErrorCategory::Infrastructure,
            Self::Connection { .. } => ErrorCategory::Infrastructure,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of storage errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The request was rejected before touching storage.
    Validation,
    /// Payload serialization failed.
    Serialization,
    /// Infrastructure/connection error.
    Infrastructure,
    /// Internal error.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Serialization => write!(f, "serialization"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
