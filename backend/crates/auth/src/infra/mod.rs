//! Infrastructure Layer
//!
//! Database implementations and external service integrations.

pub mod fixture;
pub mod identity_http;
pub mod mailer;
pub mod memory;
pub mod postgres;

pub use fixture::FixtureIdentityGateway;
pub use identity_http::HttpIdentityGateway;
pub use mailer::TracingMailer;
pub use memory::{InMemoryAccountRepository, RecordingMailer};
pub use postgres::PgAccountRepository;
