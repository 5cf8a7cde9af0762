//! Verification Mailer
//!
//! Delivery seam for freshly issued verification tokens.

use thiserror::Error;

use crate::domain::value_object::{Email, TokenGrant};

#[derive(Debug, Error)]
#[error("verification mail delivery failed: {0}")]
pub struct MailerError(pub String);

#[trait_variant::make(VerificationMailer: Send)]
pub trait LocalVerificationMailer {
    async fn send_verification(&self, email: &Email, grant: &TokenGrant) -> Result<(), MailerError>;
}
