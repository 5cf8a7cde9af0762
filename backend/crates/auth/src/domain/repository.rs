//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Every operation is a single statement scoped by primary key or email.

use chrono::{DateTime, Utc};

use crate::domain::entity::{Account, NewAccount};
use crate::domain::value_object::{AccountId, Email, TokenGrant, VerificationToken};
use crate::error::AuthResult;

/// Account mirror repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Find account by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Insert a new account; a taken email is `AuthError::EmailTaken`
    async fn insert(&self, account: &NewAccount) -> AuthResult<Account>;

    /// Unverified accounts whose stored token equals `token`, optionally
    /// narrowed to `email`. Implementations return at most two rows so the
    /// caller can detect an ambiguous match.
    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
        email: Option<&Email>,
    ) -> AuthResult<Vec<Account>>;

    /// Flip `email_verified`, clear the token and stamp `verifiedAt`.
    /// Returns `None` if the account was already verified.
    async fn mark_verified(
        &self,
        id: &AccountId,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<Option<Account>>;

    /// Replace the stored token, whatever the verification state. Returns
    /// whether an account with that email exists.
    async fn store_verification_token(&self, email: &Email, grant: &TokenGrant)
    -> AuthResult<bool>;
}
