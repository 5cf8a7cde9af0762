//! Value Object Module

pub mod account_role;
pub mod display_name;
pub mod email;
pub mod phone;
pub mod verification_token;

pub use account_role::AccountRole;
pub use display_name::DisplayName;
pub use email::Email;
pub use phone::PhoneNumber;
pub use verification_token::{TokenGrant, VerificationToken};

pub type AccountId = kernel::id::AccountId;
