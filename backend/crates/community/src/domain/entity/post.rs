//! Post Entity and read models

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entity::comment::CommentView;
use crate::domain::value_object::{
    AccountId, PostId, content::Content, post_title::PostTitle, tags::Tags,
};

#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub title: PostTitle,
    pub content: Content,
    pub author_id: AccountId,
    pub tags: Tags,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: AccountId, title: PostTitle, content: Content, tags: Tags) -> Self {
        let now = Utc::now();

        Self {
            post_id: PostId::new(),
            title,
            content,
            author_id,
            tags,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self, author_name: Option<String>) -> PostSummary {
        PostSummary {
            post_id: self.post_id,
            title: self.title.as_str().to_string(),
            content: self.content.as_str().to_string(),
            tags: self.tags.as_slice().to_vec(),
            author_id: self.author_id,
            author_name,
            created_at: self.created_at,
        }
    }
}

/// Keyword and tag criteria of the advanced filter. Both are optional; an
/// empty filter matches every post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub keyword: Option<String>,
    pub tag: Option<String>,
}

impl PostFilter {
    pub fn new(keyword: Option<String>, tag: Option<String>) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Self {
            keyword: clean(keyword),
            tag: clean(tag),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.tag.is_none()
    }

    /// In-process approximation of the store's full-text match: every keyword
    /// term must occur in the title or the content, ignoring case.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(tag) = &self.tag {
            if !post.tags.contains(tag) {
                return false;
            }
        }

        match &self.keyword {
            Some(keyword) => {
                let title = post.title.as_str().to_lowercase();
                keyword
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .all(|term| title.contains(&term) || post.content.contains_term(&term))
            }
            None => true,
        }
    }
}

/// A post as listed, with its author's current name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub author_id: AccountId,
    /// `None` once the author account is gone
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostSummary,
    pub author_email: Option<String>,
    /// Oldest first
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagTotal {
    pub tag: String,
    pub total_posts: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTagResult {
    pub matched: u64,
    pub modified: u64,
}
