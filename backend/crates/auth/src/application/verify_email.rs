//! Verify Email Use Case
//!
//! Unverified -> Verified. The token is cleared in the same statement that
//! flips the flag, so a replayed token finds nothing.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Account, VerificationFailure};
use crate::domain::repository::AccountRepository;
use crate::domain::validation::{RawField, validate_email};
use crate::domain::value_object::email::EmailError;
use crate::domain::value_object::VerificationToken;
use crate::domain::value_object::verification_token::TokenFormatError;
use crate::error::{AuthError, AuthResult};

pub struct VerifyEmailInput {
    pub token: RawField,
    pub email: RawField,
}

pub struct VerifyEmailOutput {
    pub account: Account,
}

pub struct VerifyEmailUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> VerifyEmailUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: VerifyEmailInput) -> AuthResult<VerifyEmailOutput> {
        if input.token == RawField::Malformed {
            return Err(AuthError::InvalidTokenFormat);
        }
        let token = VerificationToken::parse(
            input.token.as_text(),
            &self.config.verification_token_prefix,
        )
        .map_err(|err| match err {
            TokenFormatError::Missing => AuthError::MissingToken,
            TokenFormatError::WrongPrefix => AuthError::InvalidTokenFormat,
        })?;

        let email = match input
            .email
            .text_or("email", EmailError::InvalidFormat)?
            .map(str::trim)
        {
            None | Some("") => None,
            Some(raw) => Some(validate_email(Some(raw))?),
        };

        let candidates = self
            .repo
            .find_by_verification_token(&token, email.as_ref())
            .await?;

        let account = match candidates.as_slice() {
            [] => return Err(AuthError::InvalidOrAlreadyVerified),
            [account] => account,
            _ => {
                tracing::warn!(
                    token_fp = %token.fingerprint(),
                    matches = candidates.len(),
                    "Verification token matches more than one account"
                );
                return Err(AuthError::InvalidOrAlreadyVerified);
            }
        };

        let now = Utc::now();
        account
            .check_verification(&token, now)
            .map_err(|failure| match failure {
                VerificationFailure::InvalidOrAlreadyVerified => {
                    AuthError::InvalidOrAlreadyVerified
                }
                VerificationFailure::Expired => AuthError::TokenExpired,
            })?;

        // A concurrent verification may have won the race
        let account = self
            .repo
            .mark_verified(&account.id, now)
            .await?
            .ok_or(AuthError::InvalidOrAlreadyVerified)?;

        tracing::info!(
            account_id = %account.id,
            email = %account.email,
            token_fp = %token.fingerprint(),
            "Email verified"
        );

        Ok(VerifyEmailOutput { account })
    }
}
