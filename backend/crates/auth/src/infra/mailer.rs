//! Tracing Mailer
//!
//! Records verification deliveries as log events. The full link is only
//! emitted at debug level.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::mailer::{MailerError, VerificationMailer};
use crate::domain::value_object::{Email, TokenGrant};

#[derive(Clone)]
pub struct TracingMailer {
    config: Arc<AuthConfig>,
}

impl TracingMailer {
    pub fn new(config: Arc<AuthConfig>) -> Self {
        Self { config }
    }
}

impl VerificationMailer for TracingMailer {
    async fn send_verification(&self, email: &Email, grant: &TokenGrant) -> Result<(), MailerError> {
        tracing::info!(
            email = %email,
            token_fp = %grant.token.fingerprint(),
            expires_at = %grant.expires_at,
            "Verification mail queued"
        );
        tracing::debug!(
            email = %email,
            link = %self.config.verification_link(grant.token.as_str()),
            "Verification link"
        );
        Ok(())
    }
}
