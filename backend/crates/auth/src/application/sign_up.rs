//! Sign Up Use Case
//!
//! Registers with the identity provider first and only then writes the
//! local mirror, so a mirror row always has a provider account behind it.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::{Account, AccountMetadata, NewAccount};
use crate::domain::gateway::{IdentityGateway, ProfileData};
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::AccountRepository;
use crate::domain::validation::{SignUpInput, validate_sign_up};
use crate::domain::value_object::TokenGrant;
use crate::error::{AuthError, AuthResult};

pub const EMAIL_PROVIDER: &str = "email";

/// Sign up output
pub struct SignUpOutput {
    pub account: Account,
}

/// Sign up use case
pub struct SignUpUseCase<R, G, M>
where
    R: AccountRepository,
    G: IdentityGateway,
    M: VerificationMailer,
{
    repo: Arc<R>,
    gateway: Arc<G>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, G, M> SignUpUseCase<R, G, M>
where
    R: AccountRepository,
    G: IdentityGateway,
    M: VerificationMailer,
{
    pub fn new(repo: Arc<R>, gateway: Arc<G>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            gateway,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let valid = validate_sign_up(input)?;

        if self.repo.find_by_email(&valid.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let profile = ProfileData {
            name: valid.name.as_str().to_string(),
            role: valid.role,
            phone: valid.phone.as_ref().map(|p| p.as_str().to_string()),
        };

        let identity = self
            .gateway
            .sign_up(&valid.email, &valid.password, &profile)
            .await
            .map_err(|err| {
                if err.is_duplicate() {
                    AuthError::EmailTaken
                } else {
                    err.into()
                }
            })?;

        let grant = TokenGrant::issue(
            &self.config.verification_token_prefix,
            self.config.verification_token_bytes,
            self.config.verification_ttl,
            Utc::now(),
        );

        let metadata = AccountMetadata {
            provider: Some(EMAIL_PROVIDER.to_string()),
            external_id: Some(identity.id.clone()),
            ..Default::default()
        }
        .with_token(&grant);

        let new_account = NewAccount {
            email: valid.email,
            name: valid.name,
            phone: valid.phone,
            role: valid.role,
            metadata,
        };

        // No retry: the provider account stays and the error log carries
        // what is needed to reconcile it.
        let account = match self.repo.insert(&new_account).await {
            Ok(account) => account,
            Err(AuthError::EmailTaken) => return Err(AuthError::EmailTaken),
            Err(err) => {
                return Err(AuthError::MirrorSyncFailed {
                    email: new_account.email.to_string(),
                    external_id: identity.id,
                    detail: err.to_string(),
                });
            }
        };

        if let Err(err) = self.mailer.send_verification(&account.email, &grant).await {
            tracing::warn!(
                account_id = %account.id,
                error = %err,
                "Verification mail not delivered"
            );
        }

        tracing::info!(
            account_id = %account.id,
            email = %account.email,
            role = %account.role,
            token_fp = %grant.token.fingerprint(),
            "Account signed up"
        );

        Ok(SignUpOutput { account })
    }
}
