use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use revocation_auth::RevokedClaimsData;
use revocation_core::{EpochMillis, RevocationData, RevocationType, StoredRevocation, hash_value};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::extract::Caller;
use crate::server::AppState;

/// Separator between claim names, and between claim values before hashing.
pub const CLAIM_SEPARATOR: &str = "|";

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

// ---- Query ----

#[derive(Debug, Deserialize)]
pub struct RevocationsQuery {
    pub from: Option<EpochMillis>,
}

#[derive(Debug, Serialize)]
pub struct RevocationView<'a> {
    #[serde(rename = "type")]
    pub revocation_type: RevocationType,
    pub revoked_at: EpochMillis,
    pub revoked_by: &'a str,
    pub data: &'a RevocationData,
}

impl<'a> From<&'a StoredRevocation> for RevocationView<'a> {
    fn from(revocation: &'a StoredRevocation) -> Self {
        Self {
            revocation_type: revocation.revocation_type(),
            revoked_at: revocation.revoked_at(),
            revoked_by: revocation.revoked_by(),
            data: revocation.data(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RevocationsResponse<'a> {
    pub revocations: Vec<RevocationView<'a>>,
}

pub async fn get_revocations(
    State(state): State<AppState>,
    query: Result<Query<RevocationsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let from = query
        .from
        .ok_or_else(|| ApiError::bad_request("query parameter 'from' is required"))?;

    let mut revocations = state.store.query(from).await?;
    revocations.sort_by_key(StoredRevocation::revoked_at);

    let body = RevocationsResponse {
        revocations: revocations.iter().map(RevocationView::from).collect(),
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}

// ---- Register ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRevocationRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalRevocationRequest {
    pub issued_before: EpochMillis,
}

/// Body of `POST /revocations`. Values arrive in clear and are hashed
/// before they are stored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "UPPERCASE")]
pub enum RevocationRequest {
    Token(TokenRevocationRequest),
    Claim(RevokedClaimsData),
    Global(GlobalRevocationRequest),
}

impl RevocationRequest {
    pub fn revocation_type(&self) -> RevocationType {
        match self {
            Self::Token(_) => RevocationType::Token,
            Self::Claim(_) => RevocationType::Claim,
            Self::Global(_) => RevocationType::Global,
        }
    }
}

/// Builds the stored payload for a request received at `now`.
pub fn to_revocation_data(
    request: &RevocationRequest,
    salt: &str,
    now: EpochMillis,
) -> Result<RevocationData, ApiError> {
    match request {
        RevocationRequest::Token(token) => {
            if token.token.is_empty() {
                return Err(ApiError::bad_request("token must not be empty"));
            }
            Ok(RevocationData::token(hash_value(salt, &token.token)))
        }
        RevocationRequest::Claim(claims) => {
            if claims.claims.is_empty() {
                return Err(ApiError::bad_request("claims must not be empty"));
            }
            // Claims is ordered by name, so names and values line up.
            let names: Vec<&str> = claims.claims.keys().map(String::as_str).collect();
            let values: Vec<&str> = claims.claims.values().map(String::as_str).collect();
            Ok(RevocationData::claim(
                names.join(CLAIM_SEPARATOR),
                hash_value(salt, &values.join(CLAIM_SEPARATOR)),
                claims.issued_before.unwrap_or(now),
            ))
        }
        RevocationRequest::Global(global) => Ok(RevocationData::global(global.issued_before)),
    }
}

pub async fn post_revocation(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<RevocationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    if let RevocationRequest::Claim(claims) = &request {
        state.authorizer.authorize(claims, &caller).await?;
    }

    let now = state.clock.now_millis();
    let data = to_revocation_data(&request, &state.hash_salt, now)?;
    let revocation = StoredRevocation::new(data, caller.revoked_by(), now);
    state.store.put(&revocation).await?;

    tracing::info!(
        revocation_type = %request.revocation_type(),
        revoked_by = %revocation.revoked_by(),
        revoked_at = revocation.revoked_at(),
        "revocation registered"
    );
    Ok(StatusCode::CREATED)
}
