//! Authorization error types.

use crate::rule::AuthorizationRule;

/// Errors that can occur while authorizing a revocation request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No stored rule lets the caller revoke the requested claims.
    #[error("Not authorized to revoke claims {target}")]
    RevocationUnauthorized {
        /// The rejected target rule, built from the requested claims.
        target: AuthorizationRule,
    },

    /// The bearer token is missing, malformed, or carries no readable claims.
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of why the token is invalid.
        message: String,
    },

    /// An error occurred while reading or writing rules.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// An unexpected internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `RevocationUnauthorized` error.
    #[must_use]
    pub fn revocation_unauthorized(target: AuthorizationRule) -> Self {
        Self::RevocationUnauthorized { target }
    }

    /// Creates a new `InvalidToken` error.
    #[must_use]
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
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

    /// Returns `true` if the caller is not allowed to revoke the claims.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::RevocationUnauthorized { .. })
    }

    /// Returns `true` if this is a client error (4xx equivalent).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::RevocationUnauthorized { .. } | Self::InvalidToken { .. }
        )
    }

    /// Returns the rejected target rule, if any.
    #[must_use]
    pub fn target_rule(&self) -> Option<&AuthorizationRule> {
        match self {
            Self::RevocationUnauthorized { target } => Some(target),
            _ => None,
        }
    }
}
