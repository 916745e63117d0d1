//! Authorization rules storage trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::rule::AuthorizationRule;

/// Storage trait for [`AuthorizationRule`]s.
///
/// # Implementations
///
/// - [`crate::storage::InMemoryAuthorizationRulesStore`] - process-local rules
/// - `revocation-postgres` - PostgreSQL storage backend
#[async_trait]
pub trait AuthorizationRulesStore: Send + Sync {
    /// Returns every stored rule whose allowed revocation claims are all
    /// present, with equal values, in `target`'s allowed revocation claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn retrieve_by_matching_allowed_claims(
        &self,
        target: &AuthorizationRule,
    ) -> AuthResult<Vec<AuthorizationRule>>;

    /// Adds a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn store(&self, rule: AuthorizationRule) -> AuthResult<()>;

    /// Returns all stored rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self) -> AuthResult<Vec<AuthorizationRule>>;
}
