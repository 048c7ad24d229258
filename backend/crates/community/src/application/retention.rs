//! Comment retention

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::comment::retention_cutoff;
use crate::domain::repository::CommentRepository;
use crate::error::CommunityResult;

/// Deletes comments older than the retention window.
pub struct CommentRetention<R>
where
    R: CommentRepository,
{
    comments: Arc<R>,
}

impl<R> CommentRetention<R>
where
    R: CommentRepository + Sync,
{
    pub fn new(comments: Arc<R>) -> Self {
        Self { comments }
    }

    pub async fn purge(&self, now: DateTime<Utc>) -> CommunityResult<u64> {
        let cutoff = retention_cutoff(now);
        let purged = self.comments.purge_created_before(cutoff).await?;

        if purged > 0 {
            tracing::info!(purged, cutoff = %cutoff, "Expired comments purged");
        }
        Ok(purged)
    }
}
