//! Forgot Password Use Case

use std::sync::Arc;

use crate::domain::gateway::IdentityGateway;
use crate::domain::validation::validate_email;
use crate::error::{AuthError, AuthResult};

pub struct ForgotPasswordUseCase<G>
where
    G: IdentityGateway,
{
    gateway: Arc<G>,
}

impl<G> ForgotPasswordUseCase<G>
where
    G: IdentityGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    pub async fn execute(&self, email: Option<&str>) -> AuthResult<()> {
        let email = validate_email(email)?;

        self.gateway.reset_password(&email).await.map_err(|err| {
            if err.is_not_found() {
                AuthError::AccountNotFound(err.user_message().to_string())
            } else {
                err.into()
            }
        })?;

        tracing::info!(email = %email, "Password reset requested");
        Ok(())
    }
}
