//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

use crate::domain::value_object::verification_token::DEFAULT_TOKEN_PREFIX;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Literal prefix every verification token starts with
    pub verification_token_prefix: String,
    /// Random bytes per verification token (before base64url)
    pub verification_token_bytes: usize,
    /// Verification token lifetime (24 hours)
    pub verification_ttl: Duration,
    /// Session lifetime issued by the fixture identity gateway (24 hours)
    pub session_ttl: Duration,
    /// Front-end base URL for verification links
    pub app_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            verification_token_prefix: DEFAULT_TOKEN_PREFIX.to_string(),
            verification_token_bytes: 32,
            verification_ttl: Duration::hours(24),
            session_ttl: Duration::hours(24),
            app_url: "http://localhost:3000".to_string(),
        }
    }
}

impl AuthConfig {
    pub fn with_app_url(mut self, app_url: impl Into<String>) -> Self {
        self.app_url = app_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_verification_ttl(mut self, ttl: Duration) -> Self {
        self.verification_ttl = ttl;
        self
    }

    /// Link the user follows to verify their email
    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify-email?token={token}", self.app_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.verification_token_prefix, "verify_");
        assert_eq!(config.verification_ttl, Duration::hours(24));
        assert_eq!(config.session_ttl, Duration::hours(24));
    }

    #[test]
    fn test_verification_link() {
        let config = AuthConfig::default().with_app_url("https://campus.example.com/");
        assert_eq!(
            config.verification_link("verify_abc"),
            "https://campus.example.com/verify-email?token=verify_abc"
        );
    }
}
