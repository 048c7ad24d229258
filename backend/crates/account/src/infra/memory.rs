//! In-memory repository, used by tests and local runs without a database.
//!
//! Each method takes the lock once and releases it before returning, so the
//! failed-login increment is as atomic here as the SQL statement is in Postgres.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entity::{
    account::Account, auth_session::AuthSession, session_identity::SessionIdentity,
};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, email::Email, login_status::CounterUpdate};
use crate::error::{AccessError, AccessResult};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    sessions: HashMap<Uuid, AuthSession>,
}

#[derive(Clone, Default)]
pub struct MemoryAccountStore {
    state: Arc<Mutex<State>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AccessResult<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| AccessError::Internal("memory store poisoned".to_string()))
    }

    pub fn session_count(&self) -> usize {
        self.lock().map(|s| s.sessions.len()).unwrap_or(0)
    }
}

impl AccountRepository for MemoryAccountStore {
    async fn find_by_email(&self, email: &Email) -> AccessResult<Option<Account>> {
        Ok(self
            .lock()?
            .accounts
            .values()
            .find(|a| &a.email == email)
            .cloned())
    }

    async fn find_by_id(&self, account_id: &AccountId) -> AccessResult<Option<Account>> {
        Ok(self.lock()?.accounts.get(account_id).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AccessResult<bool> {
        Ok(self.lock()?.accounts.values().any(|a| &a.email == email))
    }

    async fn create(&self, account: &Account) -> AccessResult<()> {
        let mut state = self.lock()?;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(AccessError::DuplicateEmail);
        }
        state.accounts.insert(account.account_id, account.clone());
        Ok(())
    }

    async fn save(&self, account: &Account) -> AccessResult<()> {
        let mut state = self.lock()?;
        if state
            .accounts
            .values()
            .any(|a| a.email == account.email && a.account_id != account.account_id)
        {
            return Err(AccessError::DuplicateEmail);
        }

        if let Some(stored) = state.accounts.get_mut(&account.account_id) {
            stored.name = account.name.clone();
            stored.email = account.email.clone();
            stored.role = account.role;
            stored.profile_picture = account.profile_picture.clone();
            stored.updated_at = account.updated_at;
        }
        Ok(())
    }

    async fn record_failed_login(
        &self,
        account_id: &AccountId,
        threshold: u32,
    ) -> AccessResult<CounterUpdate> {
        let mut state = self.lock()?;
        let Some(account) = state.accounts.get_mut(account_id) else {
            return Ok(CounterUpdate::Missing);
        };
        if account.locked {
            return Ok(CounterUpdate::Locked);
        }

        let status = account.login_status().after_mismatch(threshold);
        account.apply_login_status(status);
        Ok(CounterUpdate::Applied(status.into()))
    }

    async fn reset_failed_logins(&self, account_id: &AccountId) -> AccessResult<CounterUpdate> {
        let mut state = self.lock()?;
        let Some(account) = state.accounts.get_mut(account_id) else {
            return Ok(CounterUpdate::Missing);
        };
        if account.locked {
            return Ok(CounterUpdate::Locked);
        }

        let status = account.login_status().after_match();
        account.apply_login_status(status);
        Ok(CounterUpdate::Applied(status.into()))
    }

    async fn unlock(&self, account_id: &AccountId) -> AccessResult<bool> {
        let mut state = self.lock()?;
        Ok(state
            .accounts
            .get_mut(account_id)
            .map(Account::unlock)
            .is_some())
    }

    async fn delete_by_id(&self, account_id: &AccountId) -> AccessResult<bool> {
        Ok(self.lock()?.accounts.remove(account_id).is_some())
    }
}

impl SessionRepository for MemoryAccountStore {
    async fn create(&self, session: &AuthSession) -> AccessResult<()> {
        self.lock()?
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: Uuid) -> AccessResult<Option<AuthSession>> {
        Ok(self.lock()?.sessions.get(&session_id).cloned())
    }

    async fn update_identity(&self, identity: &SessionIdentity) -> AccessResult<u64> {
        let mut state = self.lock()?;
        let mut updated = 0;
        for session in state
            .sessions
            .values_mut()
            .filter(|s| s.identity.account_id == identity.account_id)
        {
            session.identity = identity.clone();
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, session_id: Uuid) -> AccessResult<()> {
        self.lock()?.sessions.remove(&session_id);
        Ok(())
    }

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccessResult<u64> {
        let mut state = self.lock()?;
        let before = state.sessions.len();
        state
            .sessions
            .retain(|_, s| &s.identity.account_id != account_id);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn cleanup_expired(&self) -> AccessResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.lock()?;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        Ok((before - state.sessions.len()) as u64)
    }
}
