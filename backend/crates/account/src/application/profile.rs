//! Profile Use Case
//!
//! Self-service view / edit / delete of the signed-in account.

use std::sync::Arc;

use serde_json::json;

use crate::domain::audit::{AuditAction, AuditEvent, AuditSink, record_audit};
use crate::domain::entity::{account::Account, session_identity::SessionIdentity};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::account_name::AccountName;
use crate::error::{AccessError, AccessResult};

/// Fields left as `None` (or empty) keep their current value.
#[derive(Debug, Default)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub profile_picture: Option<String>,
}

pub struct ProfileUseCase<R, A>
where
    R: AccountRepository + SessionRepository,
    A: AuditSink,
{
    repo: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> ProfileUseCase<R, A>
where
    R: AccountRepository + SessionRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(repo: Arc<R>, audit: Arc<A>) -> Self {
        Self { repo, audit }
    }

    pub async fn view(&self, identity: &SessionIdentity) -> AccessResult<Account> {
        AccountRepository::find_by_id(self.repo.as_ref(), &identity.account_id)
            .await?
            .ok_or(AccessError::UserNotFound)
    }

    /// Returns the refreshed identity, already written to the account's sessions.
    pub async fn edit(
        &self,
        identity: &SessionIdentity,
        edit: ProfileEdit,
    ) -> AccessResult<SessionIdentity> {
        let mut account = self.view(identity).await?;

        if let Some(name) = edit.name.filter(|n| !n.trim().is_empty()) {
            account.name = AccountName::new(name)?;
        }
        if let Some(path) = edit.profile_picture.filter(|p| !p.is_empty()) {
            account.profile_picture = Some(path);
        }
        account.touch();

        self.repo.save(&account).await?;

        let refreshed = account.identity();
        self.repo.update_identity(&refreshed).await?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            "Profile updated"
        );
        record_audit(
            self.audit.as_ref(),
            AuditEvent::new(AuditAction::ProfileUpdated)
                .account(account.account_id)
                .email(account.email.as_str())
                .details(json!({
                    "name": account.name.as_str(),
                    "profile_picture": account.profile_picture,
                })),
        )
        .await;

        Ok(refreshed)
    }

    /// Deletes the account and every session it owns.
    pub async fn delete(&self, identity: &SessionIdentity) -> AccessResult<()> {
        let sessions = self.repo.delete_all_for_account(&identity.account_id).await?;

        if !self.repo.delete_by_id(&identity.account_id).await? {
            return Err(AccessError::UserNotFound);
        }

        tracing::info!(
            account_id = %identity.account_id,
            sessions_deleted = sessions,
            "User deleted own account"
        );
        record_audit(
            self.audit.as_ref(),
            AuditEvent::new(AuditAction::AccountDeleted)
                .account(identity.account_id)
                .email(identity.email.clone()),
        )
        .await;

        Ok(())
    }
}
