use thiserror::Error;

use crate::revocation::RevocationType;

/// Core error types for revocation payload handling
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to decode {revocation_type} revocation data: {message}")]
    Decode {
        revocation_type: RevocationType,
        message: String,
    },

    #[error("Failed to encode revocation data: {0}")]
    Encode(String),

    #[error("Unknown revocation type: {0}")]
    UnknownRevocationType(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl CoreError {
    /// Create a new Decode error
    pub fn decode(revocation_type: RevocationType, message: impl Into<String>) -> Self {
        Self::Decode {
            revocation_type,
            message: message.into(),
        }
    }

    /// Create a new Encode error
    pub fn encode(message: impl Into<String>) -> Self {
        Self::Encode(message.into())
    }

    /// Create a new UnknownRevocationType error
    pub fn unknown_revocation_type(tag: impl Into<String>) -> Self {
        Self::UnknownRevocationType(tag.into())
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(message: impl Into<String>) -> Self {
        Self::InvalidTimestamp(message.into())
    }

    /// Check if this error came from reading a stored payload
    pub fn is_decode_error(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::UnknownRevocationType(_))
    }

    /// Check if this error came from serializing a payload
    pub fn is_encode_error(&self) -> bool {
        matches!(self, Self::Encode(_))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::decode(RevocationType::Claim, "missing field `name`");
        assert_eq!(
            err.to_string(),
            "Failed to decode CLAIM revocation data: missing field `name`"
        );

        let err = CoreError::unknown_revocation_type("SESSION");
        assert_eq!(err.to_string(), "Unknown revocation type: SESSION");
    }

    #[test]
    fn test_error_predicates() {
        assert!(CoreError::decode(RevocationType::Token, "bad").is_decode_error());
        assert!(CoreError::unknown_revocation_type("x").is_decode_error());
        assert!(!CoreError::encode("bad").is_decode_error());
        assert!(CoreError::encode("bad").is_encode_error());
        assert!(!CoreError::invalid_timestamp("bad").is_encode_error());
    }
}
