//! Sign In Use Case
//!
//! Authenticates against the identity provider and passes its session
//! through untouched.

use std::sync::Arc;

use crate::domain::entity::{Account, Session};
use crate::domain::gateway::{GatewayError, IdentityGateway, IdentityUser, RAW_INVALID_CREDENTIALS};
use crate::domain::repository::AccountRepository;
use crate::domain::validation::{SignInInput, validate_sign_in};
use crate::error::{AuthError, AuthResult};

/// Profile returned to the caller
#[derive(Debug, Clone)]
pub enum SignedInUser {
    /// Local mirror row
    Account(Account),
    /// No mirror row; the provider's own view of the user
    Identity(IdentityUser),
}

/// Sign in output
pub struct SignInOutput {
    pub user: SignedInUser,
    pub session: Session,
}

/// Sign in use case
pub struct SignInUseCase<R, G>
where
    R: AccountRepository,
    G: IdentityGateway,
{
    repo: Arc<R>,
    gateway: Arc<G>,
}

impl<R, G> SignInUseCase<R, G>
where
    R: AccountRepository,
    G: IdentityGateway,
{
    pub fn new(repo: Arc<R>, gateway: Arc<G>) -> Self {
        Self { repo, gateway }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let valid = validate_sign_in(input)?;

        let grant = self
            .gateway
            .sign_in(&valid.email, &valid.password)
            .await
            .map_err(|err| match err {
                GatewayError::Rejected { raw, message } if raw == RAW_INVALID_CREDENTIALS => {
                    AuthError::InvalidCredentials(message)
                }
                other => other.into(),
            })?;

        // A missing or unreadable mirror row does not fail a login the
        // provider already accepted.
        let user = match self.repo.find_by_email(&valid.email).await {
            Ok(Some(account)) => SignedInUser::Account(account),
            Ok(None) => SignedInUser::Identity(grant.user),
            Err(err) => {
                tracing::warn!(
                    email = %valid.email,
                    error = %err,
                    "Account mirror lookup failed at sign-in"
                );
                SignedInUser::Identity(grant.user)
            }
        };

        tracing::info!(email = %valid.email, "User signed in");

        Ok(SignInOutput {
            user,
            session: grant.session,
        })
    }
}
