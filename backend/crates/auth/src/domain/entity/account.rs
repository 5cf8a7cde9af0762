//! Account Entity
//!
//! Local mirror of an identity-provider user. The provider owns the
//! credentials; this row owns the profile, role and verification state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_object::{
    AccountId, AccountRole, DisplayName, Email, PhoneNumber, TokenGrant, VerificationToken,
};

/// Open key-value bag stored as JSONB
///
/// Known keys are typed; anything else written by other services is
/// preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,

    /// RFC 3339; kept as text so a damaged value reads as "expired"
    /// instead of failing the whole row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token_expires_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountMetadata {
    pub fn with_token(mut self, grant: &TokenGrant) -> Self {
        self.verification_token = Some(grant.token.as_str().to_string());
        self.verification_token_expires_at = Some(grant.expires_at.to_rfc3339());
        self
    }

    pub fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.verification_token_expires_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The stored token and its expiry; `None` unless both are present and readable
    pub fn stored_grant(&self) -> Option<TokenGrant> {
        Some(TokenGrant {
            token: VerificationToken::from_db(self.verification_token.as_deref()?),
            expires_at: self.token_expires_at()?,
        })
    }
}

/// Why a presented token did not verify an account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailure {
    InvalidOrAlreadyVerified,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub name: String,
    pub phone: Option<String>,
    pub role: AccountRole,
    pub email_verified: bool,
    pub metadata: AccountMetadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Unverified -> Verified is allowed only for a matching token presented
    /// strictly before its expiry.
    pub fn check_verification(
        &self,
        token: &VerificationToken,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationFailure> {
        if self.email_verified {
            return Err(VerificationFailure::InvalidOrAlreadyVerified);
        }

        let matches = self
            .metadata
            .verification_token
            .as_deref()
            .is_some_and(|stored| token.matches(stored));
        if !matches {
            return Err(VerificationFailure::InvalidOrAlreadyVerified);
        }

        match self.metadata.stored_grant() {
            Some(grant) if !grant.is_expired_at(now) => Ok(()),
            _ => Err(VerificationFailure::Expired),
        }
    }
}

/// Fields for a freshly registered account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub name: DisplayName,
    pub phone: Option<PhoneNumber>,
    pub role: AccountRole,
    pub metadata: AccountMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::verification_token::DEFAULT_TOKEN_PREFIX;
    use chrono::Duration;
    use serde_json::json;

    fn account_with(grant: &TokenGrant) -> Account {
        let now = Utc::now();
        Account {
            id: AccountId::new(),
            email: Email::new("kim@example.com").unwrap(),
            name: "Kim".to_string(),
            phone: None,
            role: AccountRole::Student,
            email_verified: false,
            metadata: AccountMetadata::default().with_token(grant),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_matching_token_verifies() {
        let now = Utc::now();
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), now);
        let account = account_with(&grant);

        assert_eq!(account.check_verification(&grant.token, now), Ok(()));
    }

    #[test]
    fn test_other_token_is_rejected() {
        let now = Utc::now();
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), now);
        let account = account_with(&grant);
        let other = VerificationToken::issue(DEFAULT_TOKEN_PREFIX, 32);

        assert_eq!(
            account.check_verification(&other, now),
            Err(VerificationFailure::InvalidOrAlreadyVerified)
        );
    }

    #[test]
    fn test_verified_account_is_terminal() {
        let now = Utc::now();
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), now);
        let mut account = account_with(&grant);
        account.email_verified = true;

        assert_eq!(
            account.check_verification(&grant.token, now),
            Err(VerificationFailure::InvalidOrAlreadyVerified)
        );
    }

    #[test]
    fn test_expired_at_exact_instant() {
        let issued = Utc::now() - Duration::hours(24);
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), issued);
        let account = account_with(&grant);

        assert_eq!(
            account.check_verification(&grant.token, grant.expires_at),
            Err(VerificationFailure::Expired)
        );
        assert_eq!(
            account.check_verification(&grant.token, grant.expires_at - Duration::seconds(1)),
            Ok(())
        );
    }

    #[test]
    fn test_unreadable_expiry_counts_as_expired() {
        let now = Utc::now();
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), now);
        let mut account = account_with(&grant);
        account.metadata.verification_token_expires_at = Some("tomorrow".to_string());

        assert_eq!(
            account.check_verification(&grant.token, now),
            Err(VerificationFailure::Expired)
        );

        account.metadata.verification_token_expires_at = None;
        assert_eq!(
            account.check_verification(&grant.token, now),
            Err(VerificationFailure::Expired)
        );
    }

    #[test]
    fn test_stored_grant_reads_back_the_issued_one() {
        let grant = TokenGrant::issue(DEFAULT_TOKEN_PREFIX, 32, Duration::hours(24), Utc::now());
        let metadata = AccountMetadata::default().with_token(&grant);
        assert_eq!(metadata.stored_grant(), Some(grant));

        assert_eq!(AccountMetadata::default().stored_grant(), None);
    }

    #[test]
    fn test_metadata_keeps_unknown_keys() {
        let raw = json!({
            "provider": "email",
            "externalId": "abc",
            "verificationToken": "verify_x",
            "verificationTokenExpiresAt": "2026-01-01T00:00:00+00:00",
            "referrer": "newsletter"
        });
        let metadata: AccountMetadata = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(metadata.external_id.as_deref(), Some("abc"));
        assert_eq!(metadata.extra["referrer"], "newsletter");
        assert!(metadata.token_expires_at().is_some());
        assert_eq!(serde_json::to_value(&metadata).unwrap(), raw);
    }
}
