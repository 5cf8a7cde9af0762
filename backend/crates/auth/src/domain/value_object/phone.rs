//! Phone Number Value Object
//!
//! Loose check only: digits plus common punctuation, 7 to 15 digits.

use derive_more::Display;
use thiserror::Error;

const PHONE_MAX_LENGTH: usize = 20;
const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("올바른 전화번호 형식이 아닙니다.")]
pub struct InvalidPhone;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// `None` for an absent or blank value
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, InvalidPhone> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(phone) => Self::new(phone).map(Some),
        }
    }

    pub fn new(raw: &str) -> Result<Self, InvalidPhone> {
        let phone = raw.trim();
        if phone.len() > PHONE_MAX_LENGTH {
            return Err(InvalidPhone);
        }

        let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.');
        if !phone.chars().all(allowed) {
            return Err(InvalidPhone);
        }

        let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
        if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
            return Err(InvalidPhone);
        }

        Ok(Self(phone.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
