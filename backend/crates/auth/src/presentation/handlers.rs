//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ForgotPasswordUseCase, ResendConfirmationUseCase, SignInUseCase, SignUpUseCase,
    VerifyEmailInput, VerifyEmailUseCase,
};
use crate::domain::gateway::IdentityGateway;
use crate::domain::mailer::VerificationMailer;
use crate::domain::messages;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::email::EmailError;
use crate::error::AuthResult;
use crate::presentation::dto::{
    EmailRequest, MessageResponse, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse,
    UserView, VerifyEmailRequest, VerifyEmailResponse,
};
use crate::presentation::extract::LenientJson;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, G, M>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub gateway: Arc<G>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, G, M> AuthAppState<R, G, M>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, gateway: G, mailer: M, config: Arc<AuthConfig>) -> Self {
        Self {
            repo: Arc::new(repo),
            gateway: Arc::new(gateway),
            mailer: Arc::new(mailer),
            config,
        }
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /api/auth/signup
pub async fn sign_up<R, G, M>(
    State(state): State<AuthAppState<R, G, M>>,
    LenientJson(req): LenientJson<SignUpRequest>,
) -> AuthResult<Json<SignUpResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(
        state.repo.clone(),
        state.gateway.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let output = use_case.execute(req.into()).await?;

    Ok(Json(SignUpResponse {
        success: true,
        user: UserView::from(&output.account),
        message: messages::SIGN_UP_SUCCESS.to_string(),
    }))
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /api/auth/login
pub async fn sign_in<R, G, M>(
    State(state): State<AuthAppState<R, G, M>>,
    LenientJson(req): LenientJson<SignInRequest>,
) -> AuthResult<Json<SignInResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.gateway.clone());

    let output = use_case.execute(req.into()).await?;

    Ok(Json(SignInResponse {
        success: true,
        user: UserView::from(&output.user),
        session: output.session,
        message: messages::SIGN_IN_SUCCESS.to_string(),
    }))
}

// ============================================================================
// Forgot Password
// ============================================================================

/// POST /api/auth/forgot-password
pub async fn forgot_password<R, G, M>(
    State(state): State<AuthAppState<R, G, M>>,
    LenientJson(req): LenientJson<EmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = ForgotPasswordUseCase::new(state.gateway.clone());

    let email = req.email.text_or("email", EmailError::InvalidFormat)?;
    use_case.execute(email).await?;

    Ok(Json(MessageResponse::ok(messages::RESET_LINK_SENT)))
}

// ============================================================================
// Resend Confirmation
// ============================================================================

/// POST /api/auth/resend-confirmation
pub async fn resend_confirmation<R, G, M>(
    State(state): State<AuthAppState<R, G, M>>,
    LenientJson(req): LenientJson<EmailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = ResendConfirmationUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    let email = req.email.text_or("email", EmailError::InvalidFormat)?;
    use_case.execute(email).await?;

    Ok(Json(MessageResponse::ok(messages::CONFIRMATION_RESENT)))
}

// ============================================================================
// Verify Email
// ============================================================================

/// POST /api/auth/verify-email
pub async fn verify_email<R, G, M>(
    State(state): State<AuthAppState<R, G, M>>,
    LenientJson(req): LenientJson<VerifyEmailRequest>,
) -> AuthResult<Json<VerifyEmailResponse>>
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    let use_case = VerifyEmailUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(VerifyEmailInput {
            token: req.token,
            email: req.email,
        })
        .await?;

    Ok(Json(VerifyEmailResponse {
        success: true,
        user: UserView::from(&output.account),
        verified: true,
        message: messages::EMAIL_VERIFIED.to_string(),
    }))
}

// ============================================================================
// Method handling
// ============================================================================

/// OPTIONS on any auth endpoint: empty 200
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method other than POST / OPTIONS
pub async fn method_not_allowed() -> Response {
    AppError::method_not_allowed(messages::METHOD_NOT_ALLOWED).into_response()
}
