//! Admin User Management
//!
//! Every operation re-checks that the actor holds `Role::Admin` and names the
//! actor in the audit trail.

use std::sync::Arc;

use serde_json::json;

use crate::application::authorize::authorize;
use crate::domain::audit::{AuditAction, AuditEvent, AuditSink, record_audit};
use crate::domain::entity::{account::Account, session_identity::SessionIdentity};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{
    AccountId, account_name::AccountName, email::Email, role::Role,
};
use crate::error::{AccessError, AccessResult};

pub struct AdminUpdateInput {
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

pub struct AdminUseCase<R, A>
where
    R: AccountRepository + SessionRepository,
    A: AuditSink,
{
    repo: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> AdminUseCase<R, A>
where
    R: AccountRepository + SessionRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(repo: Arc<R>, audit: Arc<A>) -> Self {
        Self { repo, audit }
    }

    pub async fn find_by_email(&self, actor: &SessionIdentity, email: &str) -> AccessResult<Account> {
        authorize(Some(actor), Role::Admin)?;

        let email = Email::lookup(email)?;
        self.repo
            .find_by_email(&email)
            .await?
            .ok_or(AccessError::UserNotFound)
    }

    pub async fn update(
        &self,
        actor: &SessionIdentity,
        input: AdminUpdateInput,
    ) -> AccessResult<Account> {
        authorize(Some(actor), Role::Admin)?;

        let mut account = self.load(&input.account_id).await?;
        let email = Email::new(input.email)?;

        if email != account.email && self.repo.exists_by_email(&email).await? {
            return Err(AccessError::DuplicateEmail);
        }

        account.name = AccountName::new(input.name)?;
        account.email = email;
        account.role = input.role;
        account.touch();

        self.repo.save(&account).await?;
        self.repo.update_identity(&account.identity()).await?;

        tracing::info!(
            account_id = %account.account_id,
            admin = %actor.email,
            "User updated by admin"
        );
        self.audit(
            actor,
            AuditAction::AccountUpdatedByAdmin,
            &account,
            json!({ "role": account.role, "email": account.email.as_str() }),
        )
        .await;

        Ok(account)
    }

    pub async fn delete(&self, actor: &SessionIdentity, account_id: &AccountId) -> AccessResult<()> {
        authorize(Some(actor), Role::Admin)?;

        let account = self.load(account_id).await?;
        let sessions = self.repo.delete_all_for_account(account_id).await?;
        self.repo.delete_by_id(account_id).await?;

        tracing::info!(
            account_id = %account_id,
            admin = %actor.email,
            sessions_deleted = sessions,
            "User deleted by admin"
        );
        self.audit(actor, AuditAction::AccountDeletedByAdmin, &account, json!({}))
            .await;

        Ok(())
    }

    /// Clears the lock and the failed-login counter.
    pub async fn unlock(&self, actor: &SessionIdentity, account_id: &AccountId) -> AccessResult<Account> {
        authorize(Some(actor), Role::Admin)?;

        let mut account = self.load(account_id).await?;
        let was_locked = account.locked;

        if !self.repo.unlock(account_id).await? {
            return Err(AccessError::UserNotFound);
        }
        account.unlock();

        tracing::info!(
            account_id = %account_id,
            admin = %actor.email,
            was_locked,
            "User unlocked by admin"
        );
        self.audit(
            actor,
            AuditAction::AccountUnlocked,
            &account,
            json!({ "was_locked": was_locked }),
        )
        .await;

        Ok(account)
    }

    async fn load(&self, account_id: &AccountId) -> AccessResult<Account> {
        AccountRepository::find_by_id(self.repo.as_ref(), account_id)
            .await?
            .ok_or(AccessError::UserNotFound)
    }

    async fn audit(
        &self,
        actor: &SessionIdentity,
        action: AuditAction,
        target: &Account,
        mut details: serde_json::Value,
    ) {
        if let Some(map) = details.as_object_mut() {
            map.insert("admin_id".to_string(), json!(actor.account_id));
            map.insert("admin_email".to_string(), json!(actor.email));
        }

        record_audit(
            self.audit.as_ref(),
            AuditEvent::new(action)
                .account(target.account_id)
                .email(target.email.as_str())
                .details(details),
        )
        .await;
    }
}
