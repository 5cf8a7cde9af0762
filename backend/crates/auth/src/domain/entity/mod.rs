//! Entity Module

pub mod account;
pub mod session;

pub use account::{Account, AccountMetadata, NewAccount, VerificationFailure};
pub use session::Session;
