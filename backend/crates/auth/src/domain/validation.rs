//! Input Validation
//!
//! Turns raw request fields into typed values. Every field is checked and
//! all violations are reported together, one message per field, keyed by
//! the request field name.

use platform::password::{ClearTextPassword, PasswordPolicy, PasswordPolicyError};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::value_object::account_role::InvalidRole;
use crate::domain::value_object::email::EmailError;
use crate::domain::value_object::phone::InvalidPhone;
use crate::domain::value_object::{AccountRole, DisplayName, Email, PhoneNumber};

pub const PASSWORD_MISMATCH: &str = "비밀번호가 일치하지 않습니다.";
pub const TERMS_REQUIRED: &str = "이용약관에 동의해주세요.";
pub const PASSWORD_MALFORMED: &str = "올바른 비밀번호 형식이 아닙니다.";
pub const NAME_MALFORMED: &str = "올바른 이름 형식이 아닙니다.";

/// A request field as it arrived: absent, a JSON string, or some other JSON value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<Value>")]
pub enum RawField {
    #[default]
    Absent,
    Text(String),
    Malformed,
}

impl RawField {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The string value, if any; a non-string value is a violation on `field`
    pub fn text_or(
        &self,
        field: &'static str,
        malformed: impl std::fmt::Display,
    ) -> Result<Option<&str>, ValidationErrors> {
        match self {
            Self::Malformed => {
                let mut errors = ValidationErrors::new();
                errors.add(field, malformed.to_string());
                Err(errors)
            }
            other => Ok(other.as_text()),
        }
    }
}

impl From<Option<Value>> for RawField {
    fn from(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => Self::Text(text),
            Some(_) => Self::Malformed,
        }
    }
}

impl From<&str> for RawField {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Field name -> message, in the order the fields were checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the first message recorded for a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.fields.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn to_details(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, message)| (name.to_string(), Value::String(message.clone())))
            .collect();
        Value::Object(map)
    }

    /// Parses a string (or absent) field; any other JSON type is reported as `malformed`
    fn check_field<T, E: ToString>(
        &mut self,
        field: &'static str,
        raw: &RawField,
        malformed: impl std::fmt::Display,
        parse: impl FnOnce(Option<&str>) -> Result<T, E>,
    ) -> Option<T> {
        match raw {
            RawField::Malformed => {
                self.add(field, malformed.to_string());
                None
            }
            other => self.capture(field, parse(other.as_text())),
        }
    }

    fn capture<T, E: ToString>(&mut self, field: &'static str, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(field, err.to_string());
                None
            }
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.field_names().collect();
        write!(f, "invalid fields: {}", names.join(", "))
    }
}

pub fn password_message(err: &PasswordPolicyError) -> String {
    match err {
        PasswordPolicyError::Empty => "비밀번호를 입력해주세요.".to_string(),
        PasswordPolicyError::TooShort { min, .. } => {
            format!("비밀번호는 최소 {min}자 이상이어야 합니다.")
        }
        PasswordPolicyError::TooLong { max, .. } => {
            format!("비밀번호는 {max}자를 넘을 수 없습니다.")
        }
        PasswordPolicyError::MissingLowercase
        | PasswordPolicyError::MissingUppercase
        | PasswordPolicyError::MissingDigit => {
            "비밀번호는 영문 대문자, 소문자, 숫자를 모두 포함해야 합니다.".to_string()
        }
    }
}

fn check_password(
    errors: &mut ValidationErrors,
    raw: RawField,
    policy: &PasswordPolicy,
) -> Option<ClearTextPassword> {
    let raw = match raw {
        RawField::Malformed => {
            errors.add("password", PASSWORD_MALFORMED);
            return None;
        }
        other => other.into_text(),
    };

    match ClearTextPassword::new(raw.unwrap_or_default(), policy) {
        Ok(password) => Some(password),
        Err(err) => {
            errors.add("password", password_message(&err));
            None
        }
    }
}

fn check_email(errors: &mut ValidationErrors, raw: &RawField) -> Option<Email> {
    errors.check_field("email", raw, EmailError::InvalidFormat, |raw| {
        Email::new(raw.unwrap_or_default())
    })
}

// ============================================================================
// Sign up
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SignUpInput {
    pub email: RawField,
    pub password: RawField,
    pub confirm_password: RawField,
    pub name: RawField,
    pub phone: RawField,
    pub role: RawField,
    pub agree_to_terms: bool,
}

#[derive(Debug)]
pub struct ValidSignUp {
    pub email: Email,
    pub password: ClearTextPassword,
    pub name: DisplayName,
    pub phone: Option<PhoneNumber>,
    pub role: AccountRole,
}

pub fn validate_sign_up(input: SignUpInput) -> Result<ValidSignUp, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = check_email(&mut errors, &input.email);

    // Compared before the password is moved into its zeroizing wrapper
    let confirmation_mismatch = match &input.confirm_password {
        RawField::Absent => false,
        RawField::Text(confirm) => input.password.as_text() != Some(confirm.as_str()),
        RawField::Malformed => true,
    };
    let password = check_password(&mut errors, input.password, &PasswordPolicy::REGISTRATION);
    if confirmation_mismatch {
        errors.add("confirmPassword", PASSWORD_MISMATCH);
    }

    let name = errors.check_field("name", &input.name, NAME_MALFORMED, |raw| {
        DisplayName::new(raw.unwrap_or_default())
    });
    let phone = errors.check_field("phone", &input.phone, InvalidPhone, PhoneNumber::parse_optional);
    let role = errors.check_field("role", &input.role, InvalidRole, |raw| {
        match raw.map(str::trim) {
            None | Some("") => Ok(AccountRole::default()),
            Some(code) => AccountRole::from_code(code).ok_or(InvalidRole),
        }
    });

    if !input.agree_to_terms {
        errors.add("agreeToTerms", TERMS_REQUIRED);
    }

    match (email, password, name, phone, role) {
        (Some(email), Some(password), Some(name), Some(phone), Some(role)) if errors.is_empty() => {
            Ok(ValidSignUp {
                email,
                password,
                name,
                phone,
                role,
            })
        }
        _ => Err(errors),
    }
}

// ============================================================================
// Sign in
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct SignInInput {
    pub email: RawField,
    pub password: RawField,
}

#[derive(Debug)]
pub struct ValidSignIn {
    pub email: Email,
    pub password: ClearTextPassword,
}

pub fn validate_sign_in(input: SignInInput) -> Result<ValidSignIn, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let email = check_email(&mut errors, &input.email);
    let password = check_password(&mut errors, input.password, &PasswordPolicy::LOGIN);

    match (email, password) {
        (Some(email), Some(password)) => Ok(ValidSignIn { email, password }),
        _ => Err(errors),
    }
}

// ============================================================================
// Email only
// ============================================================================

pub fn validate_email(raw: Option<&str>) -> Result<Email, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors
        .capture("email", Email::new(raw.unwrap_or_default()))
        .ok_or(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sign_up() -> SignUpInput {
        SignUpInput {
            email: "a@b.com".into(),
            password: "Abcdef12".into(),
            confirm_password: RawField::Absent,
            name: "Kim".into(),
            phone: RawField::Absent,
            role: RawField::Absent,
            agree_to_terms: true,
        }
    }

    #[test]
    fn test_sign_up_valid() {
        let valid = validate_sign_up(valid_sign_up()).unwrap();
        assert_eq!(valid.email.as_str(), "a@b.com");
        assert_eq!(valid.name.as_str(), "Kim");
        assert_eq!(valid.role, AccountRole::Student);
        assert!(valid.phone.is_none());
    }

    #[test]
    fn test_sign_up_collects_every_field() {
        let errors = validate_sign_up(SignUpInput::default()).unwrap_err();
        let fields: Vec<_> = errors.field_names().collect();
        assert_eq!(fields, vec!["email", "password", "name", "agreeToTerms"]);
        assert_eq!(errors.get("agreeToTerms"), Some(TERMS_REQUIRED));
    }

    #[test]
    fn test_sign_up_short_passwords_fail_length_rule() {
        for len in 1..8 {
            let input = SignUpInput {
                password: RawField::Text("Aa1bcdefg".chars().take(len).collect()),
                ..valid_sign_up()
            };
            let errors = validate_sign_up(input).unwrap_err();
            assert_eq!(
                errors.get("password"),
                Some("비밀번호는 최소 8자 이상이어야 합니다."),
                "length {len}"
            );
        }
    }

    #[test]
    fn test_sign_up_password_composition() {
        let input = SignUpInput {
            password: "abcdefgh".into(),
            ..valid_sign_up()
        };
        let errors = validate_sign_up(input).unwrap_err();
        assert!(errors.get("password").unwrap().contains("대문자"));
    }

    #[test]
    fn test_sign_up_confirmation() {
        let input = SignUpInput {
            confirm_password: "Abcdef13".into(),
            ..valid_sign_up()
        };
        let errors = validate_sign_up(input).unwrap_err();
        assert_eq!(errors.get("confirmPassword"), Some(PASSWORD_MISMATCH));
        assert_eq!(errors.len(), 1);

        let input = SignUpInput {
            confirm_password: "Abcdef12".into(),
            ..valid_sign_up()
        };
        assert!(validate_sign_up(input).is_ok());
    }

    #[test]
    fn test_sign_up_role_and_phone() {
        let input = SignUpInput {
            role: "instructor".into(),
            phone: "010-1234-5678".into(),
            ..valid_sign_up()
        };
        let valid = validate_sign_up(input).unwrap();
        assert_eq!(valid.role, AccountRole::Instructor);
        assert_eq!(valid.phone.unwrap().as_str(), "010-1234-5678");

        let input = SignUpInput {
            role: "janitor".into(),
            phone: "not a phone".into(),
            ..valid_sign_up()
        };
        let errors = validate_sign_up(input).unwrap_err();
        assert!(errors.get("role").is_some());
        assert!(errors.get("phone").is_some());
    }

    #[test]
    fn test_sign_in_uses_login_policy() {
        let valid = validate_sign_in(SignInInput {
            email: "test@example.com".into(),
            password: "password123".into(),
        })
        .unwrap();
        assert_eq!(valid.password.expose(), "password123");

        let errors = validate_sign_in(SignInInput {
            email: "test@example.com".into(),
            password: "12345".into(),
        })
        .unwrap_err();
        assert_eq!(
            errors.get("password"),
            Some("비밀번호는 최소 6자 이상이어야 합니다.")
        );
    }

    #[test]
    fn test_malformed_emails_fail_everywhere() {
        for raw in ["plain", "a@b", "@b.com", "a@.com", "a b@c.com", "a@b.c"] {
            assert!(validate_email(Some(raw)).is_err(), "{raw}");
            assert!(
                validate_sign_in(SignInInput {
                    email: raw.into(),
                    password: "password123".into(),
                })
                .unwrap_err()
                .get("email")
                .is_some(),
                "{raw}"
            );
            let errors = validate_sign_up(SignUpInput {
                email: raw.into(),
                ..valid_sign_up()
            })
            .unwrap_err();
            assert!(errors.get("email").is_some(), "{raw}");
        }
    }

    #[test]
    fn test_wrong_type_is_reported_on_that_field_only() {
        let input = SignUpInput {
            phone: RawField::Malformed,
            ..valid_sign_up()
        };
        let errors = validate_sign_up(input).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("phone"), Some("올바른 전화번호 형식이 아닙니다."));

        let errors = validate_sign_up(SignUpInput {
            email: RawField::Malformed,
            password: RawField::Malformed,
            confirm_password: RawField::Malformed,
            name: RawField::Malformed,
            ..valid_sign_up()
        })
        .unwrap_err();
        let fields: Vec<_> = errors.field_names().collect();
        assert_eq!(fields, vec!["email", "password", "confirmPassword", "name"]);
        assert_eq!(errors.get("password"), Some(PASSWORD_MALFORMED));
        assert_eq!(errors.get("name"), Some(NAME_MALFORMED));
    }

    #[test]
    fn test_raw_field_from_json() {
        use serde_json::json;
        assert_eq!(RawField::from(None), RawField::Absent);
        assert_eq!(RawField::from(Some(Value::Null)), RawField::Absent);
        assert_eq!(RawField::from(Some(json!("x"))), RawField::Text("x".into()));
        assert_eq!(RawField::from(Some(json!(7))), RawField::Malformed);
        assert_eq!(RawField::from(Some(json!({}))), RawField::Malformed);

        let errors = RawField::Malformed
            .text_or("email", EmailError::InvalidFormat)
            .unwrap_err();
        assert_eq!(errors.get("email"), Some("올바른 이메일 형식이 아닙니다."));
        assert_eq!(RawField::Absent.text_or("email", "unused").unwrap(), None);
    }

    #[test]
    fn test_details_shape() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        errors.add("name", "bad");
        assert_eq!(
            errors.to_details(),
            serde_json::json!({ "email": "first", "name": "bad" })
        );
    }
}
