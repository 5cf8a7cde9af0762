//! Auth Router

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{MethodRouter, post};
use tower_http::cors::{Any, CorsLayer};

use crate::domain::gateway::IdentityGateway;
use crate::domain::mailer::VerificationMailer;
use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// POST plus preflight; every other method is a 405 with a JSON body
fn endpoint<S>(method_router: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    method_router
        .options(handlers::preflight)
        .fallback(handlers::method_not_allowed)
}

/// Create the Auth router for any repository, gateway and mailer
pub fn auth_router<R, G, M>(state: AuthAppState<R, G, M>) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
    G: IdentityGateway + Clone + Send + Sync + 'static,
    M: VerificationMailer + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", endpoint(post(handlers::sign_up::<R, G, M>)))
        .route("/login", endpoint(post(handlers::sign_in::<R, G, M>)))
        .route(
            "/forgot-password",
            endpoint(post(handlers::forgot_password::<R, G, M>)),
        )
        .route(
            "/resend-confirmation",
            endpoint(post(handlers::resend_confirmation::<R, G, M>)),
        )
        .route(
            "/verify-email",
            endpoint(post(handlers::verify_email::<R, G, M>)),
        )
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin; `Content-Type` and `Authorization` headers
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
