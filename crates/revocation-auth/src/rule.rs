//! Authorization rules and claim matching.
//!
//! Rules are plain values compared by their claims, never by identity. A set
//! of claims satisfies a constraint when every key of the constraint is
//! present with an equal value; keys outside the constraint are ignored, so an
//! empty constraint is satisfied by anything.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Claim name to claim value.
pub type Claims = BTreeMap<String, String>;

/// Returns `true` if `claims` carries every entry of `constraint`.
#[must_use]
pub fn claims_match(constraint: &Claims, claims: &Claims) -> bool {
    constraint
        .iter()
        .all(|(name, value)| claims.get(name) == Some(value))
}

fn empty() -> &'static Claims {
    static EMPTY: Claims = BTreeMap::new();
    &EMPTY
}

/// Required caller claims, allowed revocation claims, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRule {
    /// Claims a caller must carry for this rule to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_user_claims: Option<Claims>,

    /// Claims a caller matching this rule may revoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_revocation_claims: Option<Claims>,
}

impl AuthorizationRule {
    #[must_use]
    pub fn new(required_user_claims: Claims, allowed_revocation_claims: Claims) -> Self {
        Self {
            required_user_claims: Some(required_user_claims),
            allowed_revocation_claims: Some(allowed_revocation_claims),
        }
    }

    /// A rule describing a caller, built from the caller's own claims.
    #[must_use]
    pub fn from_required_user_claims(claims: Claims) -> Self {
        Self {
            required_user_claims: Some(claims),
            allowed_revocation_claims: None,
        }
    }

    /// A rule describing a revocation target, built from the requested claims.
    #[must_use]
    pub fn from_allowed_revocation_claims(claims: Claims) -> Self {
        Self {
            required_user_claims: None,
            allowed_revocation_claims: Some(claims),
        }
    }

    /// Required user claims, empty when absent.
    #[must_use]
    pub fn required_user_claims(&self) -> &Claims {
        self.required_user_claims.as_ref().unwrap_or(empty())
    }

    /// Allowed revocation claims, empty when absent.
    #[must_use]
    pub fn allowed_revocation_claims(&self) -> &Claims {
        self.allowed_revocation_claims.as_ref().unwrap_or(empty())
    }

    /// Returns `true` if this rule's user claims satisfy `candidate`'s
    /// required user claims.
    #[must_use]
    pub fn matches_required_user_claims(&self, candidate: &AuthorizationRule) -> bool {
        claims_match(
            candidate.required_user_claims(),
            self.required_user_claims(),
        )
    }

    /// Returns `true` if this rule's allowed claims are all present in
    /// `target`'s allowed claims, i.e. this rule permits revoking `target`.
    #[must_use]
    pub fn allows_revocation_of(&self, target: &AuthorizationRule) -> bool {
        claims_match(
            self.allowed_revocation_claims(),
            target.allowed_revocation_claims(),
        )
    }
}

fn write_claims(f: &mut fmt::Formatter<'_>, claims: &Claims) -> fmt::Result {
    for (i, (name, value)) in claims.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{name}={value}")?;
    }
    Ok(())
}

impl fmt::Display for AuthorizationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        if let Some(required) = &self.required_user_claims {
            f.write_str("required_user_claims: ")?;
            write_claims(f, required)?;
            if self.allowed_revocation_claims.is_some() {
                f.write_str("; ")?;
            }
        }
        if let Some(allowed) = &self.allowed_revocation_claims {
            f.write_str("allowed_revocation_claims: ")?;
            write_claims(f, allowed)?;
        }
        f.write_str("}")
    }
}
