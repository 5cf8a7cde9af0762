//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use std::borrow::Cow;

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use serde_json::json;
use thiserror::Error;

use crate::domain::gateway::GatewayError;
use crate::domain::messages;
use crate::domain::validation::ValidationErrors;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// One or more request fields failed validation
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Email already registered
    #[error("Email already registered")]
    EmailTaken,

    /// Provider refused the credentials (localized message)
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Verification token absent
    #[error("Verification token missing")]
    MissingToken,

    /// Verification token lacks the required prefix
    #[error("Verification token has an invalid format")]
    InvalidTokenFormat,

    /// No unverified account holds the token
    #[error("Verification token invalid or already used")]
    InvalidOrAlreadyVerified,

    /// Token matched but its expiry has passed
    #[error("Verification token expired")]
    TokenExpired,

    /// Provider reports the account does not exist (localized message)
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Any other provider rejection (localized message)
    #[error("Identity provider rejected the request: {0}")]
    GatewayRejected(String),

    /// Provider unreachable
    #[error("Identity provider unavailable: {0}")]
    GatewayUnavailable(String),

    /// Provider registration succeeded but the local mirror insert failed
    #[error("Account mirror insert failed for {email} (external id {external_id}): {detail}")]
    MirrorSyncFailed {
        email: String,
        external_id: String,
        detail: String,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_)
            | AuthError::EmailTaken
            | AuthError::InvalidCredentials(_)
            | AuthError::MissingToken
            | AuthError::InvalidTokenFormat
            | AuthError::InvalidOrAlreadyVerified
            | AuthError::TokenExpired
            | AuthError::GatewayRejected(_) => ErrorKind::BadRequest,
            AuthError::AccountNotFound(_) => ErrorKind::NotFound,
            AuthError::GatewayUnavailable(_)
            | AuthError::MirrorSyncFailed { .. }
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidTokenFormat => "INVALID_TOKEN_FORMAT",
            AuthError::InvalidOrAlreadyVerified => "INVALID_TOKEN",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            AuthError::GatewayRejected(_) => "IDENTITY_REJECTED",
            AuthError::GatewayUnavailable(_) => "IDENTITY_UNAVAILABLE",
            AuthError::MirrorSyncFailed { .. } => "ACCOUNT_SYNC_FAILED",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Localized message shown to the client
    pub fn user_message(&self) -> Cow<'static, str> {
        match self {
            AuthError::Validation(_) => messages::VALIDATION_FAILED.into(),
            AuthError::EmailTaken => messages::EMAIL_TAKEN.into(),
            AuthError::InvalidCredentials(msg)
            | AuthError::AccountNotFound(msg)
            | AuthError::GatewayRejected(msg) => msg.clone().into(),
            AuthError::MissingToken => messages::MISSING_TOKEN.into(),
            AuthError::InvalidTokenFormat => messages::INVALID_TOKEN_FORMAT.into(),
            AuthError::InvalidOrAlreadyVerified => messages::INVALID_TOKEN.into(),
            AuthError::TokenExpired => messages::TOKEN_EXPIRED.into(),
            AuthError::MirrorSyncFailed { .. } => messages::ACCOUNT_SYNC_FAILED.into(),
            AuthError::GatewayUnavailable(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                messages::GENERIC_FAILURE.into()
            }
        }
    }

    /// Convert to AppError
    ///
    /// Server errors carry their internal description in `details` only in
    /// debug builds.
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.user_message()).with_code(self.code());

        match self {
            AuthError::Validation(errors) => err.with_details(errors.to_details()),
            _ if self.kind().is_server_error() && cfg!(debug_assertions) => {
                err.with_details(json!({ "internal": self.to_string() }))
            }
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::MirrorSyncFailed {
                email,
                external_id,
                detail,
            } => {
                tracing::error!(
                    email = %email,
                    external_id = %external_id,
                    detail = %detail,
                    "Account mirror out of sync with identity provider"
                );
            }
            AuthError::GatewayUnavailable(detail) => {
                tracing::error!(detail = %detail, "Identity provider unavailable");
            }
            AuthError::InvalidCredentials(_) => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidOrAlreadyVerified | AuthError::TokenExpired => {
                tracing::info!(code = self.code(), "Verification rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<GatewayError> for AuthError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected { message, .. } => AuthError::GatewayRejected(message),
            GatewayError::Transport(detail) => AuthError::GatewayUnavailable(detail),
        }
    }
}
