use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("올바른 역할을 선택해주세요.")]
pub struct InvalidRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl AccountRole {
    #[inline]
    pub const fn code(&self) -> &'static str {
        use AccountRole::*;
        match self {
            Student => "student",
            Instructor => "instructor",
            Admin => "admin",
        }
    }

    /// Exact, case-sensitive code match
    pub fn from_code(code: &str) -> Option<Self> {
        use AccountRole::*;
        match code {
            "student" => Some(Student),
            "instructor" => Some(Instructor),
            "admin" => Some(Admin),
            _ => None,
        }
    }
}

impl FromStr for AccountRole {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or(InvalidRole)
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes_roundtrip() {
        for role in [AccountRole::Student, AccountRole::Instructor, AccountRole::Admin] {
            assert_eq!(AccountRole::from_code(role.code()), Some(role));
            assert_eq!(role.to_string().parse::<AccountRole>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role() {
        assert_eq!(AccountRole::from_code("tutor"), None);
        assert_eq!(AccountRole::from_code("Admin"), None);
        assert_eq!("".parse::<AccountRole>(), Err(InvalidRole));
    }

    #[test]
    fn test_default_and_serde() {
        assert_eq!(AccountRole::default(), AccountRole::Student);
        assert_eq!(
            serde_json::to_string(&AccountRole::Instructor).unwrap(),
            r#""instructor""#
        );
    }
}
