//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG tokens, SHA-256 fingerprints)
//! - Password policy checks over zeroized clear text
//! - Environment-based configuration helpers

pub mod config;
pub mod crypto;
pub mod password;
