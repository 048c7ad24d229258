//! Create Post Use Case

use std::sync::Arc;

use account::{AuditAction, AuditSink, SessionIdentity, record_audit};
use serde_json::json;

use crate::application::actor_event;
use crate::domain::entity::post::Post;
use crate::domain::repository::PostRepository;
use crate::domain::value_object::{
    PostId, content::Content, post_title::PostTitle, tags::Tags,
};
use crate::error::CommunityResult;

pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    /// Comma-separated
    pub tags: String,
}

pub struct CreatePostUseCase<R, A>
where
    R: PostRepository,
    A: AuditSink,
{
    posts: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> CreatePostUseCase<R, A>
where
    R: PostRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(posts: Arc<R>, audit: Arc<A>) -> Self {
        Self { posts, audit }
    }

    pub async fn execute(
        &self,
        author: &SessionIdentity,
        input: CreatePostInput,
    ) -> CommunityResult<PostId> {
        let post = Post::new(
            author.account_id,
            PostTitle::new(input.title)?,
            Content::new(input.content)?,
            Tags::parse_csv(&input.tags),
        );

        self.posts.create(&post).await?;

        tracing::info!(
            post_id = %post.post_id,
            author = %author.email,
            "Post created"
        );
        record_audit(
            self.audit.as_ref(),
            actor_event(author, AuditAction::PostCreated).details(json!({
                "post_id": post.post_id,
                "tags": post.tags,
            })),
        )
        .await;

        Ok(post.post_id)
    }
}
