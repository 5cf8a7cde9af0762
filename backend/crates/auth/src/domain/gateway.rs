//! Identity Gateway
//!
//! Contract of the external identity provider: sign-up, sign-in and
//! password reset. Adapters normalize every provider or transport failure
//! into [`GatewayError`]; nothing raw crosses this boundary.

use chrono::{DateTime, Utc};
use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::entity::Session;
use crate::domain::messages::{ErrorCatalog, GENERIC_FAILURE};
use crate::domain::value_object::{AccountRole, Email};

pub const RAW_USER_NOT_FOUND: &str = "User not found";
pub const RAW_INVALID_CREDENTIALS: &str = "Invalid login credentials";
pub const RAW_ALREADY_REGISTERED: &str = "A user with this email address has already been registered";
pub const RAW_USER_ALREADY_REGISTERED: &str = "User already registered";

/// Attributes forwarded verbatim to the provider at sign-up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileData {
    pub name: String,
    pub role: AccountRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// User as the provider reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub email_confirmed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user_metadata: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct SignInGrant {
    pub session: Session,
    pub user: IdentityUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The provider answered with an error string
    #[error("identity provider rejected the request: {raw}")]
    Rejected { raw: String, message: String },

    /// The provider could not be reached or answered with garbage
    #[error("identity provider unavailable: {0}")]
    Transport(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub fn rejected(raw: impl Into<String>, catalog: &ErrorCatalog) -> Self {
        let raw = raw.into();
        let message = catalog.translate(&raw).to_string();
        Self::Rejected { raw, message }
    }

    pub fn transport(detail: impl ToString) -> Self {
        Self::Transport(detail.to_string())
    }

    /// Localized message safe to show a user
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message, .. } => message,
            Self::Transport(_) => GENERIC_FAILURE,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { raw, .. } if raw == RAW_USER_NOT_FOUND)
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Rejected { raw, .. }
            if raw == RAW_ALREADY_REGISTERED || raw == RAW_USER_ALREADY_REGISTERED)
    }
}

/// Identity provider trait
#[trait_variant::make(IdentityGateway: Send)]
pub trait LocalIdentityGateway {
    async fn sign_up(
        &self,
        email: &Email,
        password: &ClearTextPassword,
        profile: &ProfileData,
    ) -> GatewayResult<IdentityUser>;

    async fn sign_in(&self, email: &Email, password: &ClearTextPassword)
    -> GatewayResult<SignInGrant>;

    /// Fire-and-forget: the provider mails the reset link itself
    async fn reset_password(&self, email: &Email) -> GatewayResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_is_translated() {
        let catalog = ErrorCatalog::default();
        let err = GatewayError::rejected(RAW_USER_NOT_FOUND, &catalog);

        assert!(err.is_not_found());
        assert!(!err.is_duplicate());
        assert_eq!(err.user_message(), "등록되지 않은 사용자입니다.");
    }

    #[test]
    fn test_duplicate_variants() {
        let catalog = ErrorCatalog::default();
        assert!(GatewayError::rejected(RAW_ALREADY_REGISTERED, &catalog).is_duplicate());
        assert!(GatewayError::rejected(RAW_USER_ALREADY_REGISTERED, &catalog).is_duplicate());
    }

    #[test]
    fn test_transport_hides_detail() {
        let err = GatewayError::transport("connection refused (os error 111)");
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_profile_omits_missing_phone() {
        let profile = ProfileData {
            name: "Kim".into(),
            role: AccountRole::Student,
            phone: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value, serde_json::json!({ "name": "Kim", "role": "student" }));
    }
}
