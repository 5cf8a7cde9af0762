//! Verification Token Value Object
//!
//! An email verification credential: a fixed literal prefix followed by
//! base64url-encoded CSPRNG bytes, paired with a server-issued expiry.

use chrono::{DateTime, Duration, Utc};

/// Prefix every issued token starts with
pub const DEFAULT_TOKEN_PREFIX: &str = "verify_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormatError {
    Missing,
    WrongPrefix,
}

#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Parse a presented token. Blank counts as missing; anything that does
    /// not start with `prefix` (or is only the prefix) is malformed.
    pub fn parse(raw: Option<&str>, prefix: &str) -> Result<Self, TokenFormatError> {
        let token = match raw.map(str::trim) {
            None | Some("") => return Err(TokenFormatError::Missing),
            Some(token) => token,
        };

        match token.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => Ok(Self(token.to_string())),
            _ => Err(TokenFormatError::WrongPrefix),
        }
    }

    pub fn issue(prefix: &str, random_len: usize) -> Self {
        Self(platform::crypto::random_token(prefix, random_len))
    }

    pub fn from_db(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time equality against a stored value
    pub fn matches(&self, stored: &str) -> bool {
        platform::crypto::constant_time_eq(self.0.as_bytes(), stored.as_bytes())
    }

    /// Log-safe identifier
    pub fn fingerprint(&self) -> String {
        platform::crypto::fingerprint(&self.0)
    }
}

impl std::fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VerificationToken")
            .field(&self.fingerprint())
            .finish()
    }
}

/// A token together with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub token: VerificationToken,
    pub expires_at: DateTime<Utc>,
}

impl TokenGrant {
    pub fn issue(prefix: &str, random_len: usize, ttl: Duration, now: DateTime<Utc>) -> Self {
        Self {
            token: VerificationToken::issue(prefix, random_len),
            expires_at: now + ttl,
        }
    }

    /// Expired at and after the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
