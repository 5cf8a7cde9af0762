//! Shared Kernel - Domain-crossing minimal core
//!
//! - Unified error type rendered as `{ error, code?, details? }`
//! - Typed ID wrappers

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
