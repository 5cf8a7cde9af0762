//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::{Account, AccountMetadata, NewAccount};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    AccountId, AccountRole, Email, TokenGrant, VerificationToken,
};
use crate::error::{AuthError, AuthResult};

const ACCOUNT_COLUMNS: &str =
    "id, email, name, phone, role, email_verified, metadata, created_at, updated_at";

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn insert(&self, account: &NewAccount) -> AuthResult<Account> {
        let metadata = serde_json::to_value(&account.metadata)
            .map_err(|e| AuthError::Internal(format!("Unserializable metadata: {e}")))?;

        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (email, name, phone, role, metadata)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.email.as_str())
        .bind(account.name.as_str())
        .bind(account.phone.as_ref().map(|p| p.as_str()))
        .bind(account.role.code())
        .bind(Json(metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::EmailTaken
            } else {
                AuthError::Database(e)
            }
        })?;

        row.into_account()
    }

    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
        email: Option<&Email>,
    ) -> AuthResult<Vec<Account>> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            SELECT {ACCOUNT_COLUMNS}
            FROM accounts
            WHERE email_verified = false
              AND metadata->>'verificationToken' = $1
              AND ($2::text IS NULL OR email = $2)
            LIMIT 2
            "#
        ))
        .bind(token.as_str())
        .bind(email.map(|e| e.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    async fn mark_verified(
        &self,
        id: &AccountId,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            UPDATE accounts
            SET email_verified = true,
                metadata = (metadata - 'verificationToken' - 'verificationTokenExpiresAt')
                    || jsonb_build_object('verifiedAt', $2::text),
                updated_at = $3
            WHERE id = $1 AND email_verified = false
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id.as_uuid())
        .bind(verified_at.to_rfc3339())
        .bind(verified_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    async fn store_verification_token(
        &self,
        email: &Email,
        grant: &TokenGrant,
    ) -> AuthResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE accounts
            SET metadata = metadata || jsonb_build_object(
                    'verificationToken', $2::text,
                    'verificationTokenExpiresAt', $3::text
                ),
                updated_at = now()
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .bind(grant.token.as_str())
        .bind(grant.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    name: String,
    phone: Option<String>,
    role: String,
    email_verified: bool,
    metadata: Json<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        let role = AccountRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role: {}", self.role)))?;

        let metadata: AccountMetadata = serde_json::from_value(self.metadata.0)
            .map_err(|e| AuthError::Internal(format!("Invalid metadata: {e}")))?;

        Ok(Account {
            id: AccountId::from_uuid(self.id),
            email: Email::from_db(self.email),
            name: self.name,
            phone: self.phone,
            role,
            email_verified: self.email_verified,
            metadata,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
