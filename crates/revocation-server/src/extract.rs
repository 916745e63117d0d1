use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use revocation_auth::CallerClaims;

use crate::error::ApiError;

/// The authenticated caller, read from the `Authorization: Bearer` header.
///
/// Rejects with 401 when the header is missing or the token carries no
/// readable claims.
#[derive(Debug, Clone)]
pub struct Caller(pub CallerClaims);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            tracing::debug!(path = %parts.uri.path(), "No Authorization header");
            return Err(ApiError::unauthorized("Authentication required"));
        };

        Ok(Caller(CallerClaims::from_authorization_header(header)?))
    }
}
