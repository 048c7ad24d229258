//! Authenticate Use Case
//!
//! Checks an email / password pair against the stored account and drives the
//! lockout state machine. Every outcome is written to the audit sink.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use serde_json::json;

use crate::application::config::AccountConfig;
use crate::domain::audit::{AuditAction, AuditEvent, AuditSink, record_audit};
use crate::domain::entity::{account::Account, session_identity::SessionIdentity};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::login_status::CounterUpdate;
use crate::domain::value_object::email::Email;
use crate::error::{AccessError, AccessResult, FILL_ALL_FIELDS};

pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

pub struct AuthenticateUseCase<R, A>
where
    R: AccountRepository,
    A: AuditSink,
{
    accounts: Arc<R>,
    audit: Arc<A>,
    config: Arc<AccountConfig>,
}

impl<R, A> AuthenticateUseCase<R, A>
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

    pub async fn execute(&self, input: AuthenticateInput) -> AccessResult<SessionIdentity> {
        if input.email.is_empty() || input.password.is_empty() {
            return Err(AccessError::validation(FILL_ALL_FIELDS));
        }

        // Registration caps the length; an over-long login just finds nothing.
        let email = Email::lookup(input.email)?;
        // No length policy here: a short wrong guess still counts as a failure.
        let candidate = ClearTextPassword::candidate(input.password)?;

        let Some(account) = self.accounts.find_by_email(&email).await? else {
            return Err(self.reject_unknown(&email).await);
        };

        // Locked accounts are rejected before any hash comparison.
        if account.locked {
            self.reject_locked(&account).await;
            return Err(AccessError::AccountLocked);
        }

        if !account.password.verify(&candidate, self.config.pepper()) {
            return Err(self.record_mismatch(&account).await?);
        }

        // A concurrent mismatch may have locked the account since the read.
        match self.accounts.reset_failed_logins(&account.account_id).await? {
            CounterUpdate::Applied(_) => {}
            CounterUpdate::Locked => {
                self.reject_locked(&account).await;
                return Err(AccessError::AccountLocked);
            }
            CounterUpdate::Missing => return Err(self.reject_unknown(&account.email).await),
        }

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            "User logged in"
        );
        self.audit(
            AuditEvent::new(AuditAction::LoginSucceeded)
                .account(account.account_id)
                .email(account.email.as_str()),
        )
        .await;

        Ok(account.identity())
    }

    /// Returns the error to report for this mismatch.
    async fn record_mismatch(&self, account: &Account) -> AccessResult<AccessError> {
        let update = self
            .accounts
            .record_failed_login(&account.account_id, self.config.lock_threshold)
            .await?;

        let counters = match update {
            CounterUpdate::Applied(counters) => counters,
            CounterUpdate::Locked => {
                // Another request locked the account between the read and the increment.
                self.reject_locked(account).await;
                return Ok(AccessError::AccountLocked);
            }
            CounterUpdate::Missing => return Ok(self.reject_unknown(&account.email).await),
        };

        tracing::warn!(
            account_id = %account.account_id,
            failed_logins = counters.failed_logins,
            "Incorrect password"
        );
        self.audit(
            AuditEvent::new(AuditAction::LoginInvalidPassword)
                .account(account.account_id)
                .email(account.email.as_str())
                .details(json!({ "failed_logins": counters.failed_logins })),
        )
        .await;

        if counters.locked {
            tracing::warn!(
                account_id = %account.account_id,
                failed_logins = counters.failed_logins,
                "Account locked after repeated failed logins"
            );
            self.audit(
                AuditEvent::new(AuditAction::AccountLockedOut)
                    .account(account.account_id)
                    .email(account.email.as_str())
                    .details(json!({ "failed_logins": counters.failed_logins })),
            )
            .await;
        }

        // The attempt that trips the lock still reports the mismatch.
        Ok(AccessError::InvalidPassword)
    }

    async fn reject_unknown(&self, email: &Email) -> AccessError {
        tracing::info!(email = %email, "Login attempt for unregistered email");
        self.audit(AuditEvent::new(AuditAction::LoginUnknownEmail).email(email.as_str()))
            .await;
        AccessError::NotFound
    }

    async fn reject_locked(&self, account: &Account) {
        tracing::warn!(account_id = %account.account_id, "Login attempt on locked account");
        self.audit(
            AuditEvent::new(AuditAction::LoginRejectedLocked)
                .account(account.account_id)
                .email(account.email.as_str()),
        )
        .await;
    }

    async fn audit(&self, event: AuditEvent) {
        record_audit(self.audit.as_ref(), event).await;
    }
}
