//! In-memory Adapters
//!
//! Account store and mailer doubles behaving like their production
//! counterparts, for tests and local runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::entity::{Account, NewAccount};
use crate::domain::mailer::{MailerError, VerificationMailer};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, Email, TokenGrant, VerificationToken};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
    fail_inserts: Arc<AtomicBool>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, account: Account) -> AuthResult<()> {
        self.lock()?.push(account);
        Ok(())
    }

    /// Snapshot of every stored account
    pub fn accounts(&self) -> Vec<Account> {
        self.lock().map(|a| a.clone()).unwrap_or_default()
    }

    pub fn get(&self, email: &str) -> Option<Account> {
        self.accounts()
            .into_iter()
            .find(|a| a.email.as_str() == email)
    }

    /// Make every subsequent insert fail with a non-duplicate error
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> AuthResult<MutexGuard<'_, Vec<Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::Internal("account table poisoned".to_string()))
    }
}

impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self.lock()?.iter().find(|a| &a.email == email).cloned())
    }

    async fn insert(&self, account: &NewAccount) -> AuthResult<Account> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AuthError::Internal("insert rejected".to_string()));
        }

        let mut accounts = self.lock()?;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let created = Account {
            id: AccountId::new(),
            email: account.email.clone(),
            name: account.name.as_str().to_string(),
            phone: account.phone.as_ref().map(|p| p.as_str().to_string()),
            role: account.role,
            email_verified: false,
            metadata: account.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        accounts.push(created.clone());

        Ok(created)
    }

    async fn find_by_verification_token(
        &self,
        token: &VerificationToken,
        email: Option<&Email>,
    ) -> AuthResult<Vec<Account>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|a| !a.email_verified)
            .filter(|a| {
                a.metadata
                    .verification_token
                    .as_deref()
                    .is_some_and(|stored| token.matches(stored))
            })
            .filter(|a| email.is_none_or(|e| &a.email == e))
            .take(2)
            .cloned()
            .collect())
    }

    async fn mark_verified(
        &self,
        id: &AccountId,
        verified_at: DateTime<Utc>,
    ) -> AuthResult<Option<Account>> {
        let mut accounts = self.lock()?;
        let Some(account) = accounts
            .iter_mut()
            .find(|a| &a.id == id && !a.email_verified)
        else {
            return Ok(None);
        };

        account.email_verified = true;
        account.metadata.verification_token = None;
        account.metadata.verification_token_expires_at = None;
        account.metadata.verified_at = Some(verified_at);
        account.updated_at = verified_at;

        Ok(Some(account.clone()))
    }

    async fn store_verification_token(
        &self,
        email: &Email,
        grant: &TokenGrant,
    ) -> AuthResult<bool> {
        let mut accounts = self.lock()?;
        let Some(account) = accounts.iter_mut().find(|a| &a.email == email) else {
            return Ok(false);
        };

        account.metadata = std::mem::take(&mut account.metadata).with_token(grant);
        account.updated_at = Utc::now();

        Ok(true)
    }
}

/// Mailer that keeps every delivery in memory
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<(Email, TokenGrant)>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Email, TokenGrant)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn last_for(&self, email: &str) -> Option<TokenGrant> {
        self.sent()
            .into_iter()
            .rev()
            .find(|(to, _)| to.as_str() == email)
            .map(|(_, grant)| grant)
    }
}

impl VerificationMailer for RecordingMailer {
    async fn send_verification(&self, email: &Email, grant: &TokenGrant) -> Result<(), MailerError> {
        self.sent
            .lock()
            .map_err(|_| MailerError("outbox poisoned".to_string()))?
            .push((email.clone(), grant.clone()));
        Ok(())
    }
}
