//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractor, and router.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod router;

pub use handlers::AuthAppState;
pub use router::{auth_router, cors_layer};
