//! Advanced Filter Use Case
//!
//! One request does three things over the posts matching the keyword/tag
//! criteria, in this order:
//! 1. count tag occurrences,
//! 2. append the `updated` tag to each of them,
//! 3. list them newest first (so the new tag is already visible).

use std::sync::Arc;

use account::{AuditAction, AuditSink, SessionIdentity, record_audit};
use serde::Serialize;
use serde_json::json;

use crate::application::actor_event;
use crate::domain::entity::post::{BulkTagResult, PostFilter, PostSummary, TagCount};
use crate::domain::repository::PostRepository;
use crate::domain::value_object::tags::UPDATED_TAG;
use crate::error::CommunityResult;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome {
    pub tag_counts: Vec<TagCount>,
    pub bulk_result: BulkTagResult,
    pub posts: Vec<PostSummary>,
}

pub struct AdvancedFilterUseCase<R, A>
where
    R: PostRepository,
    A: AuditSink,
{
    posts: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> AdvancedFilterUseCase<R, A>
where
    R: PostRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(posts: Arc<R>, audit: Arc<A>) -> Self {
        Self { posts, audit }
    }

    pub async fn execute(
        &self,
        actor: &SessionIdentity,
        filter: PostFilter,
    ) -> CommunityResult<FilterOutcome> {
        let tag_counts = self.posts.count_tags(&filter).await?;
        let bulk_result = self.posts.append_tag(&filter, UPDATED_TAG).await?;
        let posts = self.posts.list(&filter, None).await?;

        tracing::info!(
            keyword = ?filter.keyword,
            tag = ?filter.tag,
            matched = bulk_result.matched,
            modified = bulk_result.modified,
            "Posts filtered and tagged"
        );
        record_audit(
            self.audit.as_ref(),
            actor_event(actor, AuditAction::PostsBulkTagged).details(json!({
                "keyword": filter.keyword,
                "tag": filter.tag,
                "matched": bulk_result.matched,
                "modified": bulk_result.modified,
            })),
        )
        .await;

        Ok(FilterOutcome {
            tag_counts,
            bulk_result,
            posts,
        })
    }
}
