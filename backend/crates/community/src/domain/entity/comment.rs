//! Comment Entity

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::domain::value_object::{AccountId, CommentId, PostId, content::Content};

/// Comments are purged this long after creation.
pub const COMMENT_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: AccountId,
    pub content: Content,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, author_id: AccountId, content: Content) -> Self {
        Self {
            comment_id: CommentId::new(),
            post_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }

    pub fn view(&self, author_name: Option<String>) -> CommentView {
        CommentView {
            comment_id: self.comment_id,
            content: self.content.as_str().to_string(),
            author_id: self.author_id,
            author_name,
            created_at: self.created_at,
        }
    }
}

/// Cut-off for comment retention relative to `now`.
pub fn retention_cutoff(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(COMMENT_RETENTION_DAYS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub comment_id: CommentId,
    pub content: String,
    pub author_id: AccountId,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
