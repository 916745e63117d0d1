//! Claim-based revocation authorization.

use revocation_core::EpochMillis;
use serde::{Deserialize, Serialize};

use crate::AuthResult;
use crate::claims::CallerClaims;
use crate::error::AuthError;
use crate::rule::{AuthorizationRule, Claims};
use crate::storage::DynRulesStore;

/// The claims a caller asks to revoke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokedClaimsData {
    pub claims: Claims,
    /// Tokens issued before this instant are revoked; defaults to the time
    /// of the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_before: Option<EpochMillis>,
}

/// Decides whether a caller may register a claim revocation.
///
/// The request is allowed when some stored rule both allows revoking the
/// requested claims and has its required user claims satisfied by the
/// caller's claims. The only side effect is the rules-store read.
pub struct ClaimRevocationAuthorizer {
    rules: DynRulesStore,
}

impl ClaimRevocationAuthorizer {
    pub fn new(rules: DynRulesStore) -> Self {
        Self { rules }
    }

    /// # Errors
    ///
    /// Returns [`AuthError::RevocationUnauthorized`] carrying the target rule
    /// when no compatible rule matches the caller, or a storage error if the
    /// rules cannot be read.
    pub async fn authorize(
        &self,
        claims_data: &RevokedClaimsData,
        caller: &CallerClaims,
    ) -> AuthResult<()> {
        let source_rule = AuthorizationRule::from_required_user_claims(caller.claims().clone());
        let target_rule =
            AuthorizationRule::from_allowed_revocation_claims(claims_data.claims.clone());

        let candidates = self
            .rules
            .retrieve_by_matching_allowed_claims(&target_rule)
            .await?;

        if candidates
            .iter()
            .any(|candidate| source_rule.matches_required_user_claims(candidate))
        {
            tracing::debug!(
                candidates = candidates.len(),
                "claim revocation authorized"
            );
            Ok(())
        } else {
            tracing::info!(
                candidates = candidates.len(),
                target = %target_rule,
                "claim revocation denied"
            );
            Err(AuthError::revocation_unauthorized(target_rule))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::InMemoryAuthorizationRulesStore;

    fn claims(pairs: &[(&str, &str)]) -> Claims {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn authorizer(rules: Vec<AuthorizationRule>) -> ClaimRevocationAuthorizer {
        ClaimRevocationAuthorizer::new(Arc::new(InMemoryAuthorizationRulesStore::with_rules(
            rules,
        )))
    }

    fn revoke(pairs: &[(&str, &str)]) -> RevokedClaimsData {
        RevokedClaimsData {
            claims: claims(pairs),
            issued_before: None,
        }
    }

    fn employee_admin_rule() -> AuthorizationRule {
        AuthorizationRule::new(
            claims(&[("realm", "/services"), ("uid", "stups")]),
            claims(&[("realm", "/employees")]),
        )
    }

    #[tokio::test]
    async fn test_authorize_matching_caller() {
        let authorizer = authorizer(vec![employee_admin_rule()]);
        let caller = CallerClaims::new(claims(&[
            ("realm", "/services"),
            ("uid", "stups"),
            ("scope", "uid"),
        ]));

        authorizer
            .authorize(&revoke(&[("realm", "/employees"), ("uid", "rreis")]), &caller)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_authorize_missing_required_claim() {
        let authorizer = authorizer(vec![employee_admin_rule()]);
        let caller = CallerClaims::new(claims(&[("uid", "stups")]));

        let err = authorizer
            .authorize(&revoke(&[("realm", "/employees")]), &caller)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(
            err.target_rule(),
            Some(&AuthorizationRule::from_allowed_revocation_claims(claims(&[(
                "realm",
                "/employees"
            )])))
        );
    }

    #[tokio::test]
    async fn test_authorize_mismatching_required_claim() {
        let authorizer = authorizer(vec![employee_admin_rule()]);
        let caller = CallerClaims::new(claims(&[("realm", "/services"), ("uid", "mallory")]));

        let err = authorizer
            .authorize(&revoke(&[("realm", "/employees")]), &caller)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_authorize_no_compatible_rule() {
        let authorizer = authorizer(vec![employee_admin_rule()]);
        let caller = CallerClaims::new(claims(&[("realm", "/services"), ("uid", "stups")]));

        let err = authorizer
            .authorize(&revoke(&[("realm", "/services")]), &caller)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_authorize_any_candidate_suffices() {
        let authorizer = authorizer(vec![
            employee_admin_rule(),
            AuthorizationRule::new(
                claims(&[("uid", "helpdesk")]),
                claims(&[("realm", "/employees")]),
            ),
        ]);
        let caller = CallerClaims::new(claims(&[("uid", "helpdesk")]));

        authorizer
            .authorize(&revoke(&[("realm", "/employees"), ("uid", "x")]), &caller)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_authorize_without_rules() {
        let authorizer = authorizer(Vec::new());
        let caller = CallerClaims::new(claims(&[("uid", "root")]));

        let err = authorizer
            .authorize(&revoke(&[("uid", "x")]), &caller)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_revoked_claims_data_serde() {
        let data: RevokedClaimsData = serde_json::from_value(serde_json::json!({
            "claims": {"uid": "rreis"},
            "issued_before": 1455631200000i64
        }))
        .unwrap();
        assert_eq!(data.claims, claims(&[("uid", "rreis")]));
        assert_eq!(data.issued_before, Some(1_455_631_200_000));

        let data: RevokedClaimsData =
            serde_json::from_value(serde_json::json!({"claims": {}})).unwrap();
        assert!(data.issued_before.is_none());
    }
}
