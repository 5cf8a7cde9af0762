//! User-facing Messages
//!
//! Localized (Korean) response texts and the translation table for the
//! identity provider's English error strings.

use std::borrow::Cow;
use std::collections::HashMap;

pub const SIGN_UP_SUCCESS: &str = "회원가입이 완료되었습니다. 이메일을 확인하여 계정을 인증해주세요.";
pub const SIGN_IN_SUCCESS: &str = "로그인되었습니다.";
pub const RESET_LINK_SENT: &str = "비밀번호 재설정 링크가 이메일로 발송되었습니다.";
/// Same text whether or not the account exists
pub const CONFIRMATION_RESENT: &str =
    "해당 이메일로 가입된 계정이 있다면 인증 메일이 발송됩니다. 메일함을 확인해주세요.";
pub const EMAIL_VERIFIED: &str = "이메일 인증이 완료되었습니다.";

pub const VALIDATION_FAILED: &str = "입력값을 확인해주세요.";
pub const EMAIL_TAKEN: &str = "이미 가입된 이메일입니다.";
pub const INVALID_CREDENTIALS: &str = "이메일 또는 비밀번호가 올바르지 않습니다.";
pub const MISSING_TOKEN: &str = "인증 토큰이 필요합니다.";
pub const INVALID_TOKEN_FORMAT: &str = "유효하지 않은 토큰 형식입니다.";
pub const INVALID_TOKEN: &str = "유효하지 않거나 이미 인증된 토큰입니다.";
pub const TOKEN_EXPIRED: &str = "인증 토큰이 만료되었습니다. 인증 메일을 다시 요청해주세요.";
pub const ACCOUNT_SYNC_FAILED: &str =
    "회원가입 처리 중 오류가 발생했습니다. 잠시 후 다시 시도하거나 고객센터에 문의해주세요.";
pub const GENERIC_FAILURE: &str = "요청을 처리하는 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";
pub const METHOD_NOT_ALLOWED: &str = "허용되지 않은 요청 방식입니다.";

const DEFAULT_TRANSLATIONS: &[(&str, &str)] = &[
    ("Invalid login credentials", INVALID_CREDENTIALS),
    ("User not found", "등록되지 않은 사용자입니다."),
    (
        "Email not confirmed",
        "이메일 인증이 완료되지 않았습니다. 메일함을 확인해주세요.",
    ),
    (
        "A user with this email address has already been registered",
        EMAIL_TAKEN,
    ),
    ("User already registered", EMAIL_TAKEN),
    (
        "Password should be at least 6 characters",
        "비밀번호는 최소 6자 이상이어야 합니다.",
    ),
    (
        "Unable to validate email address: invalid format",
        "이메일 형식이 올바르지 않습니다.",
    ),
    (
        "Email rate limit exceeded",
        "이메일 발송 한도를 초과했습니다. 잠시 후 다시 시도해주세요.",
    ),
    (
        "For security purposes, you can only request this once every 60 seconds",
        "보안을 위해 60초에 한 번만 요청할 수 있습니다.",
    ),
    (
        "Signups not allowed for this instance",
        "현재 회원가입이 허용되지 않습니다.",
    ),
];

/// Exact-match translation table
///
/// Unknown strings are not an error; they pass through untranslated.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    entries: HashMap<Cow<'static, str>, Cow<'static, str>>,
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        let entries = DEFAULT_TRANSLATIONS
            .iter()
            .map(|(raw, localized)| (Cow::Borrowed(*raw), Cow::Borrowed(*localized)))
            .collect();
        Self { entries }
    }
}

impl ErrorCatalog {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn with_entry(
        mut self,
        raw: impl Into<Cow<'static, str>>,
        localized: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.entries.insert(raw.into(), localized.into());
        self
    }

    pub fn translate<'a>(&'a self, raw: &'a str) -> &'a str {
        self.entries.get(raw).map(|m| m.as_ref()).unwrap_or(raw)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
