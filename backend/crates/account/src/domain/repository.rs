//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{
    account::Account, auth_session::AuthSession, session_identity::SessionIdentity,
};
use crate::domain::value_object::{AccountId, email::Email, login_status::CounterUpdate};
use crate::error::AccessResult;

#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Exact, case-sensitive match
    async fn find_by_email(&self, email: &Email) -> AccessResult<Option<Account>>;

    async fn find_by_id(&self, account_id: &AccountId) -> AccessResult<Option<Account>>;

    async fn exists_by_email(&self, email: &Email) -> AccessResult<bool>;

    /// Insert. A taken email fails with `DuplicateEmail`.
    async fn create(&self, account: &Account) -> AccessResult<()>;

    /// Update profile fields, role and email by id. Login counters are not written.
    async fn save(&self, account: &Account) -> AccessResult<()>;

    /// Atomically add one failed login and lock once `threshold` is reached.
    /// A locked row is left untouched.
    async fn record_failed_login(
        &self,
        account_id: &AccountId,
        threshold: u32,
    ) -> AccessResult<CounterUpdate>;

    /// Zero the counter after a successful login, only while the row is unlocked.
    async fn reset_failed_logins(&self, account_id: &AccountId) -> AccessResult<CounterUpdate>;

    /// Administrative unlock: `locked = false`, `failed_logins = 0`.
    async fn unlock(&self, account_id: &AccountId) -> AccessResult<bool>;

    async fn delete_by_id(&self, account_id: &AccountId) -> AccessResult<bool>;
}

#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &AuthSession) -> AccessResult<()>;

    async fn find_by_id(&self, session_id: Uuid) -> AccessResult<Option<AuthSession>>;

    /// Replace the identity snapshot in every session of `identity.account_id`.
    async fn update_identity(&self, identity: &SessionIdentity) -> AccessResult<u64>;

    async fn delete(&self, session_id: Uuid) -> AccessResult<()>;

    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccessResult<u64>;

    async fn cleanup_expired(&self) -> AccessResult<u64>;
}
