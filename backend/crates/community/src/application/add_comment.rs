//! Add Comment Use Case

use std::sync::Arc;

use account::{AuditAction, AuditSink, SessionIdentity, record_audit};
use serde_json::json;

use crate::application::actor_event;
use crate::domain::entity::comment::Comment;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::domain::value_object::{CommentId, PostId, content::Content};
use crate::error::{CommunityError, CommunityResult};

pub struct AddCommentUseCase<R, A>
where
    R: PostRepository + CommentRepository,
    A: AuditSink,
{
    repo: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> AddCommentUseCase<R, A>
where
    R: PostRepository + CommentRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(repo: Arc<R>, audit: Arc<A>) -> Self {
        Self { repo, audit }
    }

    pub async fn execute(
        &self,
        author: &SessionIdentity,
        post_id: &PostId,
        content: String,
    ) -> CommunityResult<CommentId> {
        if !self.repo.exists(post_id).await? {
            return Err(CommunityError::PostNotFound);
        }

        let comment = Comment::new(*post_id, author.account_id, Content::new(content)?);
        CommentRepository::create(self.repo.as_ref(), &comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %post_id,
            author = %author.email,
            "Comment created"
        );
        record_audit(
            self.audit.as_ref(),
            actor_event(author, AuditAction::CommentAdded).details(json!({
                "comment_id": comment.comment_id,
                "post_id": post_id,
            })),
        )
        .await;

        Ok(comment.comment_id)
    }
}
