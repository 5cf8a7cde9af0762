//! Fixture Identity Gateway
//!
//! In-process stand-in for the identity provider, seeded with test
//! accounts. Used in tests and in debug builds without `IDENTITY_URL`.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Duration, Utc};
use platform::crypto::{constant_time_eq, random_token};
use platform::password::ClearTextPassword;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entity::Session;
use crate::domain::gateway::{
    GatewayError, GatewayResult, IdentityGateway, IdentityUser, ProfileData, RAW_ALREADY_REGISTERED,
    RAW_INVALID_CREDENTIALS, RAW_USER_NOT_FOUND, SignInGrant,
};
use crate::domain::messages::ErrorCatalog;
use crate::domain::value_object::{AccountRole, Email};

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";

#[derive(Debug, Clone)]
struct FixtureUser {
    id: String,
    email: String,
    password: String,
    name: String,
    role: AccountRole,
}

impl FixtureUser {
    fn to_identity(&self) -> IdentityUser {
        IdentityUser {
            id: self.id.clone(),
            email: self.email.clone(),
            email_confirmed_at: None,
            user_metadata: json!({ "name": self.name, "role": self.role.code() }),
            created_at: None,
        }
    }
}

#[derive(Clone)]
pub struct FixtureIdentityGateway {
    users: Arc<Mutex<Vec<FixtureUser>>>,
    session_ttl: Duration,
    catalog: ErrorCatalog,
}

impl Default for FixtureIdentityGateway {
    fn default() -> Self {
        Self::seeded()
    }
}

impl FixtureIdentityGateway {
    /// No accounts
    pub fn empty() -> Self {
        Self {
            users: Arc::new(Mutex::new(Vec::new())),
            session_ttl: Duration::hours(24),
            catalog: ErrorCatalog::default(),
        }
    }

    /// One account per role, all with [`TEST_PASSWORD`]
    pub fn seeded() -> Self {
        Self::empty()
            .with_user(TEST_EMAIL, TEST_PASSWORD, "테스트 학생", AccountRole::Student)
            .with_user(
                "instructor@example.com",
                TEST_PASSWORD,
                "테스트 강사",
                AccountRole::Instructor,
            )
            .with_user(
                "admin@example.com",
                TEST_PASSWORD,
                "테스트 관리자",
                AccountRole::Admin,
            )
    }

    pub fn with_user(self, email: &str, password: &str, name: &str, role: AccountRole) -> Self {
        if let Ok(mut users) = self.users.lock() {
            users.push(FixtureUser {
                id: Uuid::new_v4().to_string(),
                email: email.trim().to_lowercase(),
                password: password.to_string(),
                name: name.to_string(),
                role,
            });
        }
        self
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn contains(&self, email: &str) -> bool {
        self.lock()
            .map(|users| users.iter().any(|u| u.email == email))
            .unwrap_or(false)
    }

    fn lock(&self) -> GatewayResult<MutexGuard<'_, Vec<FixtureUser>>> {
        self.users
            .lock()
            .map_err(|_| GatewayError::transport("fixture user table poisoned"))
    }

    fn issue_session(&self) -> Session {
        let now = Utc::now();
        Session {
            access_token: random_token("fixture_at_", 32),
            refresh_token: random_token("fixture_rt_", 32),
            expires_at: (now + self.session_ttl).timestamp(),
            expires_in: self.session_ttl.num_seconds(),
            token_type: "bearer".to_string(),
        }
    }
}

impl IdentityGateway for FixtureIdentityGateway {
    async fn sign_up(
        &self,
        email: &Email,
        password: &ClearTextPassword,
        profile: &ProfileData,
    ) -> GatewayResult<IdentityUser> {
        let mut users = self.lock()?;
        if users.iter().any(|u| u.email == email.as_str()) {
            return Err(GatewayError::rejected(RAW_ALREADY_REGISTERED, &self.catalog));
        }

        let user = FixtureUser {
            id: Uuid::new_v4().to_string(),
            email: email.as_str().to_string(),
            password: password.expose().to_string(),
            name: profile.name.clone(),
            role: profile.role,
        };
        let identity = user.to_identity();
        users.push(user);

        Ok(identity)
    }

    async fn sign_in(
        &self,
        email: &Email,
        password: &ClearTextPassword,
    ) -> GatewayResult<SignInGrant> {
        let user = self
            .lock()?
            .iter()
            .find(|u| {
                u.email == email.as_str()
                    && constant_time_eq(u.password.as_bytes(), password.expose().as_bytes())
            })
            .map(FixtureUser::to_identity);

        match user {
            Some(user) => Ok(SignInGrant {
                session: self.issue_session(),
                user,
            }),
            None => Err(GatewayError::rejected(RAW_INVALID_CREDENTIALS, &self.catalog)),
        }
    }

    async fn reset_password(&self, email: &Email) -> GatewayResult<()> {
        if self.lock()?.iter().any(|u| u.email == email.as_str()) {
            Ok(())
        } else {
            Err(GatewayError::rejected(RAW_USER_NOT_FOUND, &self.catalog))
        }
    }
}
