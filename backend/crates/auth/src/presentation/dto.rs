//! API DTOs (Data Transfer Objects)
//!
//! Request fields accept any JSON value: a missing field reaches the
//! validator as absent and a wrongly-typed one as malformed, so one bad field
//! never hides the others.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::SignedInUser;
use crate::domain::entity::{Account, Session};
use crate::domain::gateway::IdentityUser;
use crate::domain::validation::{RawField, SignInInput, SignUpInput};
use crate::domain::value_object::AccountRole;

// ============================================================================
// Shared
// ============================================================================

/// Public view of an account; metadata (and the token in it) stays server-side
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AccountRole>,
    pub email_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Account> for UserView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.to_string(),
            name: Some(account.name.clone()),
            phone: account.phone.clone(),
            role: Some(account.role),
            email_verified: account.email_verified,
            created_at: Some(account.created_at),
            updated_at: Some(account.updated_at),
        }
    }
}

impl From<&IdentityUser> for UserView {
    fn from(user: &IdentityUser) -> Self {
        let attr = |key: &str| {
            user.user_metadata
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: attr("name"),
            phone: attr("phone"),
            role: attr("role").and_then(|code| AccountRole::from_code(&code)),
            email_verified: user.email_confirmed_at.is_some(),
            created_at: user.created_at,
            updated_at: None,
        }
    }
}

impl From<&SignedInUser> for UserView {
    fn from(user: &SignedInUser) -> Self {
        match user {
            SignedInUser::Account(account) => account.into(),
            SignedInUser::Identity(identity) => identity.into(),
        }
    }
}

/// `{ success, message }`
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub email: RawField,
    pub password: RawField,
    pub confirm_password: RawField,
    pub name: RawField,
    pub phone: RawField,
    pub role: RawField,
    /// Must be the JSON literal `true`
    pub agree_to_terms: Option<Value>,
}

impl From<SignUpRequest> for SignUpInput {
    fn from(req: SignUpRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            name: req.name,
            phone: req.phone,
            role: req.role,
            agree_to_terms: req.agree_to_terms == Some(Value::Bool(true)),
        }
    }
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub success: bool,
    pub user: UserView,
    pub message: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    pub email: RawField,
    pub password: RawField,
}

impl From<SignInRequest> for SignInInput {
    fn from(req: SignInRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

/// Sign in response; `session` keeps the provider's snake_case fields
#[derive(Debug, Clone, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    pub user: UserView,
    pub session: Session,
    pub message: String,
}

// ============================================================================
// Forgot Password / Resend Confirmation
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmailRequest {
    pub email: RawField,
}

// ============================================================================
// Verify Email
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VerifyEmailRequest {
    pub token: RawField,
    pub email: RawField,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailResponse {
    pub success: bool,
    pub user: UserView,
    pub verified: bool,
    pub message: String,
}
