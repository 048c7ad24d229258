//! Repository Traits

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    comment::Comment,
    group::Group,
    post::{BulkTagResult, Post, PostDetail, PostFilter, PostSummary, TagCount, TagTotal},
};
use crate::domain::value_object::{AccountId, CommentId, GroupId, PostId};
use crate::error::CommunityResult;

#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> CommunityResult<()>;

    async fn exists(&self, post_id: &PostId) -> CommunityResult<bool>;

    /// Matching posts, newest first. `limit: None` returns all of them.
    async fn list(
        &self,
        filter: &PostFilter,
        limit: Option<i64>,
    ) -> CommunityResult<Vec<PostSummary>>;

    /// Post with author name and email and its comments.
    async fn detail(&self, post_id: &PostId) -> CommunityResult<Option<PostDetail>>;

    /// Occurrences of each tag across matching posts.
    async fn count_tags(&self, filter: &PostFilter) -> CommunityResult<Vec<TagCount>>;

    /// Append `tag` to every matching post in one statement.
    async fn append_tag(&self, filter: &PostFilter, tag: &str) -> CommunityResult<BulkTagResult>;

    /// Replace the stored per-tag totals with a fresh count over all posts.
    async fn snapshot_tag_totals(&self) -> CommunityResult<Vec<TagTotal>>;

    /// Removes the post together with its comments.
    async fn delete_by_id(&self, post_id: &PostId) -> CommunityResult<bool>;
}

#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &Comment) -> CommunityResult<()>;

    async fn delete_many(&self, comment_ids: &[CommentId]) -> CommunityResult<u64>;

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> CommunityResult<u64>;
}

#[trait_variant::make(GroupRepository: Send)]
pub trait LocalGroupRepository {
    async fn create(&self, group: &Group) -> CommunityResult<()>;

    async fn find_by_id(&self, group_id: &GroupId) -> CommunityResult<Option<Group>>;

    /// `Ok(None)` when the group does not exist, `Ok(Some(false))` when the
    /// account was already a member.
    async fn add_member(
        &self,
        group_id: &GroupId,
        account_id: &AccountId,
    ) -> CommunityResult<Option<bool>>;
}
