//! Domain Layer
//!
//! Contains entities, value objects, validation, and the repository,
//! gateway and mailer traits.

pub mod entity;
pub mod gateway;
pub mod mailer;
pub mod messages;
pub mod repository;
pub mod validation;
pub mod value_object;

// Re-exports
pub use entity::{Account, AccountMetadata, NewAccount, Session};
pub use gateway::{GatewayError, GatewayResult, IdentityGateway, IdentityUser, ProfileData, SignInGrant};
pub use mailer::{MailerError, VerificationMailer};
pub use messages::ErrorCatalog;
pub use repository::AccountRepository;
pub use validation::ValidationErrors;
