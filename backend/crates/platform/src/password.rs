//! Password Policy Checks
//!
//! Passwords are never hashed or stored by this service; they are checked
//! against a policy and forwarded to the identity provider. The clear text is
//! held in a zeroize-on-drop wrapper for the short time it lives in memory.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum length for new passwords
pub const REGISTRATION_MIN_LENGTH: usize = 8;

/// Minimum length accepted at sign-in
pub const LOGIN_MIN_LENGTH: usize = 6;

/// Upper bound applied to every policy
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password policy violation errors
///
/// Only the first violated rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,

    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password must contain a lowercase letter")]
    MissingLowercase,

    #[error("Password must contain an uppercase letter")]
    MissingUppercase,

    #[error("Password must contain a digit")]
    MissingDigit,
}

/// Composition rules for a password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digit: bool,
}

impl PasswordPolicy {
    /// New accounts: 8+ characters with lowercase, uppercase and a digit
    pub const REGISTRATION: Self = Self {
        min_length: REGISTRATION_MIN_LENGTH,
        require_lowercase: true,
        require_uppercase: true,
        require_digit: true,
    };

    /// Sign-in: 6+ characters, no composition rules
    pub const LOGIN: Self = Self {
        min_length: LOGIN_MIN_LENGTH,
        require_lowercase: false,
        require_uppercase: false,
        require_digit: false,
    };

    pub fn check(&self, password: &str) -> Result<(), PasswordPolicyError> {
        if password.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        // Count code points, not bytes
        let actual = password.chars().count();
        if actual < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min: self.min_length,
                actual,
            });
        }
        if actual > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual,
            });
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
            return Err(PasswordPolicyError::MissingLowercase);
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
            return Err(PasswordPolicyError::MissingUppercase);
        }
        if self.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PasswordPolicyError::MissingDigit);
        }

        Ok(())
    }
}

/// Clear text password with automatic memory zeroization
///
/// Does not implement `Clone`; debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Check `raw` against `policy` and wrap it.
    ///
    /// The input is used verbatim: no trimming or normalization, since the
    /// identity provider compares exactly what the user typed.
    pub fn new(raw: String, policy: &PasswordPolicy) -> Result<Self, PasswordPolicyError> {
        let password = Self(raw);
        policy.check(&password.0)?;
        Ok(password)
    }

    /// Borrow the clear text for forwarding to the identity provider
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_policy_accepts_mixed() {
        assert!(PasswordPolicy::REGISTRATION.check("Abcdef12").is_ok());
    }

    #[test]
    fn test_registration_policy_rejects_short() {
        for len in 1..REGISTRATION_MIN_LENGTH {
            let candidate = format!("Aa1{}", "x".repeat(len.saturating_sub(3)));
            let candidate: String = candidate.chars().take(len).collect();
            assert!(
                matches!(
                    PasswordPolicy::REGISTRATION.check(&candidate),
                    Err(PasswordPolicyError::TooShort { min: 8, .. })
                ),
                "length {len} should be too short"
            );
        }
    }

    #[test]
    fn test_registration_policy_composition() {
        let policy = PasswordPolicy::REGISTRATION;
        assert_eq!(
            policy.check("ABCDEFG1"),
            Err(PasswordPolicyError::MissingLowercase)
        );
        assert_eq!(
            policy.check("abcdefg1"),
            Err(PasswordPolicyError::MissingUppercase)
        );
        assert_eq!(
            policy.check("Abcdefgh"),
            Err(PasswordPolicyError::MissingDigit)
        );
    }

    #[test]
    fn test_login_policy_is_looser() {
        let policy = PasswordPolicy::LOGIN;
        assert!(policy.check("abcdef").is_ok());
        assert!(policy.check("password123").is_ok());
        assert_eq!(
            policy.check("abcde"),
            Err(PasswordPolicyError::TooShort { min: 6, actual: 5 })
        );
        assert_eq!(policy.check(""), Err(PasswordPolicyError::Empty));
    }

    #[test]
    fn test_too_long() {
        let long = format!("Aa1{}", "x".repeat(MAX_PASSWORD_LENGTH));
        assert!(matches!(
            PasswordPolicy::REGISTRATION.check(&long),
            Err(PasswordPolicyError::TooLong { .. })
        ));
    }

    #[test]
    fn test_multibyte_length_counts_chars() {
        // 8 code points, far more than 8 bytes
        assert!(PasswordPolicy::REGISTRATION.check("Aé1éééé한").is_ok());
    }

    #[test]
    fn test_clear_text_is_verbatim_and_redacted() {
        let password =
            ClearTextPassword::new(" Abcdef12 ".to_string(), &PasswordPolicy::REGISTRATION)
                .unwrap();
        assert_eq!(password.expose(), " Abcdef12 ");

        let debug = format!("{password:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("Abcdef12"));
    }
}
