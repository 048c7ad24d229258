//! Browse Posts Use Case
//!
//! Read-only views: the full list, the dashboard's latest posts, one post
//! with its comments.

use std::sync::Arc;

use account::SessionIdentity;

use crate::domain::entity::post::{PostDetail, PostFilter, PostSummary};
use crate::domain::repository::PostRepository;
use crate::domain::value_object::PostId;
use crate::error::{CommunityError, CommunityResult};

/// Number of posts on the dashboard
pub const DASHBOARD_POST_LIMIT: i64 = 5;

pub struct BrowsePostsUseCase<R>
where
    R: PostRepository,
{
    posts: Arc<R>,
}

impl<R> BrowsePostsUseCase<R>
where
    R: PostRepository + Sync,
{
    pub fn new(posts: Arc<R>) -> Self {
        Self { posts }
    }

    pub async fn list(&self, _viewer: &SessionIdentity) -> CommunityResult<Vec<PostSummary>> {
        self.posts.list(&PostFilter::default(), None).await
    }

    pub async fn recent(
        &self,
        _viewer: &SessionIdentity,
        limit: i64,
    ) -> CommunityResult<Vec<PostSummary>> {
        self.posts.list(&PostFilter::default(), Some(limit)).await
    }

    pub async fn get(&self, _viewer: &SessionIdentity, post_id: &PostId) -> CommunityResult<PostDetail> {
        self.posts
            .detail(post_id)
            .await?
            .ok_or(CommunityError::PostNotFound)
    }
}
