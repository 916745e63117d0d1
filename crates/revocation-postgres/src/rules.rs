//! Authorization rules in PostgreSQL.
//!
//! Claim maps are stored as JSONB objects of string values, so "every allowed
//! claim of the rule is present in the target" is JSONB containment: the
//! rule's `allowed_revocation_claims <@` the target's claims.

use std::sync::Arc;

use async_trait::async_trait;
use revocation_auth::{AuthResult, AuthorizationRule, AuthorizationRulesStore, Claims};
use serde_json::Value;
use sqlx_core::query::query;
use sqlx_core::query_as::query_as;
use sqlx_postgres::{PgPool, Postgres};
use uuid::Uuid;

use crate::error::Result;

type RuleTuple = (Option<Value>, Option<Value>);

const SELECT_BY_ALLOWED_CLAIMS: &str = r#"
    SELECT required_user_claims, allowed_revocation_claims
    FROM authorization_rule
    WHERE COALESCE(allowed_revocation_claims, '{}'::jsonb) <@ $1
"#;

const SELECT_ALL: &str = r#"
    SELECT required_user_claims, allowed_revocation_claims
    FROM authorization_rule
"#;

const INSERT_RULE: &str = r#"
    INSERT INTO authorization_rule (id, required_user_claims, allowed_revocation_claims)
    VALUES ($1, $2, $3)
"#;

/// [`AuthorizationRulesStore`] over the `authorization_rule` table.
#[derive(Debug, Clone)]
pub struct PostgresAuthorizationRulesStore {
    pool: Arc<PgPool>,
}

impl PostgresAuthorizationRulesStore {
    /// Create a new rules store with a connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn select(
        &self,
        sql: &'static str,
        target: Option<Value>,
    ) -> Result<Vec<AuthorizationRule>> {
        let mut statement = query_as::<Postgres, RuleTuple>(sql);
        if let Some(target) = target {
            statement = statement.bind(target);
        }
        let rows = statement.fetch_all(self.pool.as_ref()).await?;
        rows.into_iter().map(rule_from_tuple).collect()
    }

    async fn insert(&self, rule: &AuthorizationRule) -> Result<()> {
        query(INSERT_RULE)
            .bind(Uuid::new_v4())
            .bind(claims_to_json(rule.required_user_claims.as_ref())?)
            .bind(claims_to_json(rule.allowed_revocation_claims.as_ref())?)
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

fn claims_to_json(claims: Option<&Claims>) -> Result<Option<Value>> {
    Ok(claims.map(serde_json::to_value).transpose()?)
}

fn claims_from_json(value: Option<Value>) -> Result<Option<Claims>> {
    Ok(value.map(serde_json::from_value).transpose()?)
}

fn rule_from_tuple(row: RuleTuple) -> Result<AuthorizationRule> {
    Ok(AuthorizationRule {
        required_user_claims: claims_from_json(row.0)?,
        allowed_revocation_claims: claims_from_json(row.1)?,
    })
}

#[async_trait]
impl AuthorizationRulesStore for PostgresAuthorizationRulesStore {
    async fn retrieve_by_matching_allowed_claims(
        &self,
        target: &AuthorizationRule,
    ) -> AuthResult<Vec<AuthorizationRule>> {
        let target = serde_json::to_value(target.allowed_revocation_claims())
            .map_err(crate::error::PostgresError::from)?;
        Ok(self.select(SELECT_BY_ALLOWED_CLAIMS, Some(target)).await?)
    }

    async fn store(&self, rule: AuthorizationRule) -> AuthResult<()> {
        Ok(self.insert(&rule).await?)
    }

    async fn list(&self) -> AuthResult<Vec<AuthorizationRule>> {
        Ok(self.select(SELECT_ALL, None).await?)
    }
}
