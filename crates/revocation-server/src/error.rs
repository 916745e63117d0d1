use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use revocation_auth::{AuthError, AuthorizationRule};
use revocation_storage::{ErrorCategory, StorageError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
        target_rule: Option<AuthorizationRule>,
    },
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_rule: Option<&'a AuthorizationRule>,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind used as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden { .. } => "forbidden",
            ApiError::Unavailable(_) => "unavailable",
            ApiError::Internal(_) => "internal",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Unavailable(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::Forbidden { message, .. } => message.clone(),
        }
    }

    pub fn to_body(&self) -> ErrorBody<'_> {
        let target_rule = match self {
            ApiError::Forbidden { target_rule, .. } => target_rule.as_ref(),
            _ => None,
        };
        ErrorBody {
            error: self.kind(),
            message: self.message(),
            target_rule,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(self.to_body())).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err.category() {
            ErrorCategory::Validation => ApiError::bad_request(err.to_string()),
            _ if matches!(err, StorageError::Connection { .. }) => {
                ApiError::Unavailable(err.to_string())
            }
            _ => ApiError::internal(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::RevocationUnauthorized { .. } => ApiError::Forbidden {
                message: err.to_string(),
                target_rule: err.target_rule().cloned(),
            },
            AuthError::InvalidToken { .. } => ApiError::unauthorized(err.to_string()),
            AuthError::Storage { .. } | AuthError::Internal { .. } => {
                ApiError::internal(err.to_string())
            }
        }
    }
}
