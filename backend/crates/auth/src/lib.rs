//! Auth (Authentication & Email Verification) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects, entities, validator, repository / gateway / mailer traits
//! - `application/` - Use cases and application services
//! - `infra/` - PostgreSQL store, identity provider clients, in-memory doubles
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Sign-up through an external identity provider with a local account mirror
//! - Sign-in returning the provider session untouched
//! - Password reset delegated to the provider
//! - Email verification with random, expiring, single-use tokens
//!
//! ## Security Model
//! - Passwords are never stored; clear text is zeroized after forwarding
//! - Verification tokens are 32 CSPRNG bytes, compared in constant time and
//!   cleared on use; logs carry only a fingerprint
//! - Resend confirmation never reveals whether an account exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{FixtureIdentityGateway, HttpIdentityGateway, PgAccountRepository, TracingMailer};
pub use presentation::{AuthAppState, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
