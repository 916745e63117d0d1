//! In-memory authorization rules store.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::AuthResult;
use crate::rule::AuthorizationRule;
use crate::storage::rules::AuthorizationRulesStore;

/// Rules held in process memory, typically seeded from configuration.
#[derive(Debug, Default)]
pub struct InMemoryAuthorizationRulesStore {
    rules: RwLock<Vec<AuthorizationRule>>,
}

impl InMemoryAuthorizationRulesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: impl IntoIterator<Item = AuthorizationRule>) -> Self {
        Self {
            rules: RwLock::new(rules.into_iter().collect()),
        }
    }
}

#[async_trait]
impl AuthorizationRulesStore for InMemoryAuthorizationRulesStore {
    async fn retrieve_by_matching_allowed_claims(
        &self,
        target: &AuthorizationRule,
    ) -> AuthResult<Vec<AuthorizationRule>> {
        let rules = self.rules.read().await;
        Ok(rules
            .iter()
            .filter(|rule| rule.allows_revocation_of(target))
            .cloned()
            .collect())
    }

    async fn store(&self, rule: AuthorizationRule) -> AuthResult<()> {
        self.rules.write().await.push(rule);
        Ok(())
    }

    async fn list(&self) -> AuthResult<Vec<AuthorizationRule>> {
        Ok(self.rules.read().await.clone())
    }
}
