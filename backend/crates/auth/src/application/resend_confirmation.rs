//! Resend Confirmation Use Case
//!
//! Issues a fresh token for any existing account and always answers the same
//! way for a well-formed email, whether or not the account exists.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::AccountRepository;
use crate::domain::validation::validate_email;
use crate::domain::value_object::TokenGrant;
use crate::error::AuthResult;

pub struct ResendConfirmationUseCase<R, M>
where
    R: AccountRepository,
    M: VerificationMailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> ResendConfirmationUseCase<R, M>
where
    R: AccountRepository,
    M: VerificationMailer,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: Option<&str>) -> AuthResult<()> {
        let email = validate_email(email)?;

        // Issuing rotates whatever token was stored before
        let grant = TokenGrant::issue(
            &self.config.verification_token_prefix,
            self.config.verification_token_bytes,
            self.config.verification_ttl,
            Utc::now(),
        );

        if !self.repo.store_verification_token(&email, &grant).await? {
            tracing::debug!(email = %email, "No account for resend");
            return Ok(());
        }

        match self.mailer.send_verification(&email, &grant).await {
            Ok(()) => tracing::info!(
                email = %email,
                token_fp = %grant.token.fingerprint(),
                "Verification token reissued"
            ),
            Err(err) => tracing::warn!(
                email = %email,
                error = %err,
                "Verification mail not delivered"
            ),
        }

        Ok(())
    }
}
