//! Audit Trail
//!
//! Security-relevant events. Recording is fire-and-forget: a sink failure is
//! logged and never changes the outcome of the operation that produced it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::domain::value_object::AccountId;
use crate::error::AccessResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    LoginSucceeded,
    LoginUnknownEmail,
    LoginRejectedLocked,
    LoginInvalidPassword,
    AccountLockedOut,
    AccountRegistered,
    ProfileUpdated,
    AccountDeleted,
    AccountUpdatedByAdmin,
    AccountDeletedByAdmin,
    AccountUnlocked,
    PostCreated,
    PostDeleted,
    PostsBulkTagged,
    CommentAdded,
    CommentsBulkDeleted,
    TagTotalsSnapshotted,
    GroupCreated,
    GroupJoined,
}

impl AuditAction {
    pub const fn as_str(&self) -> &'static str {
        use AuditAction::*;
        match self {
            LoginSucceeded => "login_succeeded",
            LoginUnknownEmail => "login_unknown_email",
            LoginRejectedLocked => "login_rejected_locked",
            LoginInvalidPassword => "login_invalid_password",
            AccountLockedOut => "account_locked_out",
            AccountRegistered => "account_registered",
            ProfileUpdated => "profile_updated",
            AccountDeleted => "account_deleted",
            AccountUpdatedByAdmin => "account_updated_by_admin",
            AccountDeletedByAdmin => "account_deleted_by_admin",
            AccountUnlocked => "account_unlocked",
            PostCreated => "post_created",
            PostDeleted => "post_deleted",
            PostsBulkTagged => "posts_bulk_tagged",
            CommentAdded => "comment_added",
            CommentsBulkDeleted => "comments_bulk_deleted",
            TagTotalsSnapshotted => "tag_totals_snapshotted",
            GroupCreated => "group_created",
            GroupJoined => "group_joined",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub account_id: Option<AccountId>,
    pub email: Option<String>,
    pub details: Value,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            account_id: None,
            email: None,
            details: Value::Null,
            occurred_at: Utc::now(),
        }
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

#[trait_variant::make(AuditSink: Send)]
pub trait LocalAuditSink {
    async fn record(&self, event: &AuditEvent) -> AccessResult<()>;
}

/// Record `event`, logging instead of failing.
pub async fn record_audit<A: AuditSink>(sink: &A, event: AuditEvent) {
    if let Err(e) = sink.record(&event).await {
        tracing::warn!(
            error = %e,
            action = event.action.as_str(),
            "Failed to record audit event"
        );
    }
}
