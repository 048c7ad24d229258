//! Domain Layer
//!
//! Posts, comments, groups and the tag read models.

pub mod entity;
pub mod repository;
pub mod value_object;

pub use entity::{
    comment::{COMMENT_RETENTION_DAYS, Comment, CommentView},
    group::Group,
    post::{BulkTagResult, Post, PostDetail, PostFilter, PostSummary, TagCount, TagTotal},
};
pub use repository::{CommentRepository, GroupRepository, PostRepository};
pub use value_object::{AccountId, CommentId, GroupId, PostId, tags::UPDATED_TAG};
