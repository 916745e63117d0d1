//! # revocation-auth
//!
//! Decides who may register a claim-based revocation.
//!
//! ## Overview
//!
//! Authorization is rule based. An [`AuthorizationRule`] pairs the claims a
//! caller must carry (`required_user_claims`) with the claims that caller is
//! then allowed to revoke (`allowed_revocation_claims`). A request to revoke a
//! set of claims is allowed when some stored rule allows those claims and the
//! caller's own claims satisfy that rule's requirements.
//!
//! ## Modules
//!
//! - [`rule`] - rule model and claim matching
//! - [`storage`] - rule storage trait and in-memory implementation
//! - [`authorizer`] - [`ClaimRevocationAuthorizer`]
//! - [`claims`] - caller claims resolved from a bearer token

pub mod authorizer;
pub mod claims;
pub mod error;
pub mod rule;
pub mod storage;

pub use authorizer::{ClaimRevocationAuthorizer, RevokedClaimsData};
pub use claims::CallerClaims;
pub use error::AuthError;
pub use rule::{AuthorizationRule, Claims, claims_match};
pub use storage::{AuthorizationRulesStore, DynRulesStore, InMemoryAuthorizationRulesStore};

/// Type alias for authorization results.
pub type AuthResult<T> = Result<T, AuthError>;
