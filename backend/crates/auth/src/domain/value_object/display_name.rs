//! Display Name Value Object
//!
//! NFKC-normalized, trimmed, 2 to 50 characters (code points).

use derive_more::Display;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayNameError {
    #[error("이름을 입력해주세요.")]
    Empty,

    #[error("이름은 2자 이상 50자 이하로 입력해주세요.")]
    Length { length: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DisplayNameError> {
        let normalized: String = raw.as_ref().nfkc().collect();
        let name = normalized.trim();

        if name.is_empty() {
            return Err(DisplayNameError::Empty);
        }

        let length = name.chars().count();
        if !(DISPLAY_NAME_MIN_LENGTH..=DISPLAY_NAME_MAX_LENGTH).contains(&length) {
            return Err(DisplayNameError::Length { length });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
