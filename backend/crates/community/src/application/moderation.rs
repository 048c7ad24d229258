//! Moderation Use Case (admin only)

use std::sync::Arc;

use account::{AuditAction, AuditSink, Role, SessionIdentity, authorize, record_audit};
use serde_json::json;

use crate::application::actor_event;
use crate::domain::entity::post::TagTotal;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::domain::value_object::{CommentId, PostId};
use crate::error::{CommunityError, CommunityResult};

pub struct ModerationUseCase<R, A>
where
    R: PostRepository + CommentRepository,
    A: AuditSink,
{
    repo: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> ModerationUseCase<R, A>
where
    R: PostRepository + CommentRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(repo: Arc<R>, audit: Arc<A>) -> Self {
        Self { repo, audit }
    }

    pub async fn delete_post(&self, actor: &SessionIdentity, post_id: &PostId) -> CommunityResult<()> {
        authorize(Some(actor), Role::Admin)?;

        if !self.repo.delete_by_id(post_id).await? {
            return Err(CommunityError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, admin = %actor.email, "Post deleted");
        record_audit(
            self.audit.as_ref(),
            actor_event(actor, AuditAction::PostDeleted).details(json!({ "post_id": post_id })),
        )
        .await;

        Ok(())
    }

    /// Unknown ids are skipped. Returns the number of comments removed.
    pub async fn bulk_delete_comments(
        &self,
        actor: &SessionIdentity,
        comment_ids: &[CommentId],
    ) -> CommunityResult<u64> {
        authorize(Some(actor), Role::Admin)?;

        if comment_ids.is_empty() {
            return Err(CommunityError::validation("No comments selected."));
        }

        let deleted = self.repo.delete_many(comment_ids).await?;

        tracing::info!(
            requested = comment_ids.len(),
            deleted,
            admin = %actor.email,
            "Bulk comment deletion"
        );
        record_audit(
            self.audit.as_ref(),
            actor_event(actor, AuditAction::CommentsBulkDeleted).details(json!({
                "comment_ids": comment_ids,
                "deleted": deleted,
            })),
        )
        .await;

        Ok(deleted)
    }

    pub async fn snapshot_tag_totals(&self, actor: &SessionIdentity) -> CommunityResult<Vec<TagTotal>> {
        authorize(Some(actor), Role::Admin)?;

        let totals = self.repo.snapshot_tag_totals().await?;

        tracing::info!(tags = totals.len(), admin = %actor.email, "Tag totals snapshot written");
        record_audit(
            self.audit.as_ref(),
            actor_event(actor, AuditAction::TagTotalsSnapshotted)
                .details(json!({ "tags": totals.len() })),
        )
        .await;

        Ok(totals)
    }
}
