//! Caller identity claims.
//!
//! The registry sits behind an identity layer that has already validated the
//! caller's bearer token. Here the token is only read: the JWT payload segment
//! is decoded into a flat claim map. The signature is not checked.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::AuthResult;
use crate::error::AuthError;
use crate::rule::Claims;

/// Claims of the authenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerClaims(Claims);

impl CallerClaims {
    #[must_use]
    pub fn new(claims: Claims) -> Self {
        Self(claims)
    }

    /// Reads the claims from the value of an `Authorization` header. The
    /// scheme name is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] if the header is not a bearer
    /// token or the token is not a readable JWT.
    pub fn from_authorization_header(header: &str) -> AuthResult<Self> {
        match header.trim_start().split_once(' ') {
            Some((scheme, token))
                if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() =>
            {
                Self::from_bearer(token.trim())
            }
            _ => Err(AuthError::invalid_token(
                "Invalid Authorization header format",
            )),
        }
    }

    /// Decodes the payload of a JWT.
    ///
    /// String claims are taken as-is; other JSON values keep their JSON text
    /// (`true`, `42`, `["a","b"]`).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] for non-JWT tokens, since
    /// claim-based revocation needs the caller's claims.
    pub fn from_bearer(token: &str) -> AuthResult<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) => payload,
            _ => return Err(AuthError::invalid_token("token is not a JWT")),
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| AuthError::invalid_token(format!("malformed JWT payload: {e}")))?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::invalid_token(format!("malformed JWT payload: {e}")))?;

        let Value::Object(object) = value else {
            return Err(AuthError::invalid_token("JWT payload is not an object"));
        };

        Ok(Self(
            object
                .into_iter()
                .map(|(name, value)| {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (name, value)
                })
                .collect(),
        ))
    }

    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Who to record as the author of a revocation: `uid`, else `sub`.
    #[must_use]
    pub fn revoked_by(&self) -> &str {
        self.get("uid")
            .or_else(|| self.get("sub"))
            .unwrap_or("unknown")
    }

    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.0
    }
}
