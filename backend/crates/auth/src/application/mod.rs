//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod forgot_password;
pub mod resend_confirmation;
pub mod sign_in;
pub mod sign_up;
pub mod verify_email;

// Re-exports
pub use config::AuthConfig;
pub use forgot_password::ForgotPasswordUseCase;
pub use resend_confirmation::ResendConfirmationUseCase;
pub use sign_in::{SignInOutput, SignInUseCase, SignedInUser};
pub use sign_up::{SignUpOutput, SignUpUseCase};
pub use verify_email::{VerifyEmailInput, VerifyEmailOutput, VerifyEmailUseCase};
