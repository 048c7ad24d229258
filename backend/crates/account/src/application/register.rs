//! Register Use Case
//!
//! Creates a new account with a hashed password.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountConfig;
use crate::domain::audit::{AuditAction, AuditEvent, AuditSink, record_audit};
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    AccountId, account_name::AccountName, email::Email, role::Role,
};
use crate::error::{AccessError, AccessResult, FILL_ALL_FIELDS};

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to `Role::User`
    pub role: Option<Role>,
}

pub struct RegisterUseCase<R, A>
where
    R: AccountRepository,
    A: AuditSink,
{
    accounts: Arc<R>,
    audit: Arc<A>,
    config: Arc<AccountConfig>,
}

impl<R, A> RegisterUseCase<R, A>
where
    R: AccountRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(accounts: Arc<R>, audit: Arc<A>, config: Arc<AccountConfig>) -> Self {
        Self {
            accounts,
            audit,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccessResult<AccountId> {
        if input.name.trim().is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(AccessError::validation(FILL_ALL_FIELDS));
        }

        let name = AccountName::new(input.name)?;
        let email = Email::new(input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AccessError::DuplicateEmail);
        }

        let hashed = password.hash(self.config.pepper())?;
        let account = Account::new(name, email, hashed, input.role.unwrap_or_default());

        // A concurrent registration can still win the race; the store's unique
        // constraint turns that into DuplicateEmail.
        self.accounts.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            role = %account.role,
            "User registered"
        );
        record_audit(
            self.audit.as_ref(),
            AuditEvent::new(AuditAction::AccountRegistered)
                .account(account.account_id)
                .email(account.email.as_str()),
        )
        .await;

        Ok(account.account_id)
    }
}
