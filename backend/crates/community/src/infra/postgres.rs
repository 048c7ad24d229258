//! PostgreSQL Community Repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    comment::{Comment, CommentView},
    group::Group,
    post::{BulkTagResult, Post, PostDetail, PostFilter, PostSummary, TagCount, TagTotal},
};
use crate::domain::repository::{CommentRepository, GroupRepository, PostRepository};
use crate::domain::value_object::{
    AccountId, CommentId, GroupId, PostId, group_name::GroupName,
};
use crate::error::CommunityResult;

#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

/// `$1` keyword (full-text over title and content), `$2` tag. NULL disables either.
const POST_FILTER: &str = r#"
    ($1::text IS NULL
        OR to_tsvector('english', p.title || ' ' || p.content) @@ plainto_tsquery('english', $1))
    AND ($2::text IS NULL OR $2 = ANY(p.tags))
"#;

const SUMMARY_COLUMNS: &str = r#"
    p.post_id,
    p.title,
    p.content,
    p.tags,
    p.author_id,
    a.name AS author_name,
    p.created_at
"#;

impl PostRepository for PgCommunityRepository {
    async fn create(&self, post: &Post) -> CommunityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (post_id, title, content, author_id, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.title.as_str())
        .bind(post.content.as_str())
        .bind(post.author_id.as_uuid())
        .bind(post.tags.as_slice())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn exists(&self, post_id: &PostId) -> CommunityResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE post_id = $1)")
                .bind(post_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: Option<i64>,
    ) -> CommunityResult<Vec<PostSummary>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}
            FROM posts p
            LEFT JOIN accounts a ON a.account_id = p.author_id
            WHERE {POST_FILTER}
            ORDER BY p.created_at DESC
            LIMIT $3
            "#
        ))
        .bind(filter.keyword.as_deref())
        .bind(filter.tag.as_deref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRow::into_summary).collect())
    }

    async fn detail(&self, post_id: &PostId) -> CommunityResult<Option<PostDetail>> {
        let Some(row) = sqlx::query_as::<_, PostDetailRow>(&format!(
            r#"
            SELECT {SUMMARY_COLUMNS}, a.email AS author_email
            FROM posts p
            LEFT JOIN accounts a ON a.account_id = p.author_id
            WHERE p.post_id = $1
            "#
        ))
        .bind(post_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let comments = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.comment_id, c.content, c.author_id, a.name AS author_name, c.created_at
            FROM comments c
            LEFT JOIN accounts a ON a.account_id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(PostDetail {
            post: row.post.into_summary(),
            author_email: row.author_email,
            comments: comments.into_iter().map(CommentRow::into_view).collect(),
        }))
    }

    async fn count_tags(&self, filter: &PostFilter) -> CommunityResult<Vec<TagCount>> {
        let rows = sqlx::query_as::<_, (String, i64)>(&format!(
            r#"
            SELECT tag, COUNT(*) AS count
            FROM posts p, unnest(p.tags) AS tag
            WHERE {POST_FILTER}
            GROUP BY tag
            ORDER BY count DESC, tag ASC
            "#
        ))
        .bind(filter.keyword.as_deref())
        .bind(filter.tag.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(tag, count)| TagCount { tag, count })
            .collect())
    }

    async fn append_tag(&self, filter: &PostFilter, tag: &str) -> CommunityResult<BulkTagResult> {
        let result = sqlx::query(&format!(
            r#"
            UPDATE posts p
            SET tags = array_append(p.tags, $3), updated_at = NOW()
            WHERE {POST_FILTER}
            "#
        ))
        .bind(filter.keyword.as_deref())
        .bind(filter.tag.as_deref())
        .bind(tag)
        .execute(&self.pool)
        .await?;

        // array_append always changes the row, so every match is a modification.
        let affected = result.rows_affected();
        Ok(BulkTagResult {
            matched: affected,
            modified: affected,
        })
    }

    async fn snapshot_tag_totals(&self) -> CommunityResult<Vec<TagTotal>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM posts_aggregation")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO posts_aggregation (tag, total_posts, computed_at)
            SELECT tag, COUNT(*), NOW()
            FROM posts p, unnest(p.tags) AS tag
            GROUP BY tag
            "#,
        )
        .execute(&mut *tx)
        .await?;

        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT tag, total_posts FROM posts_aggregation ORDER BY total_posts DESC, tag ASC",
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(rows
            .into_iter()
            .map(|(tag, total_posts)| TagTotal { tag, total_posts })
            .collect())
    }

    async fn delete_by_id(&self, post_id: &PostId) -> CommunityResult<bool> {
        // comments go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM posts WHERE post_id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgCommunityRepository {
    async fn create(&self, comment: &Comment) -> CommunityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (comment_id, post_id, author_id, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(comment.content.as_str())
        .bind(comment.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_many(&self, comment_ids: &[CommentId]) -> CommunityResult<u64> {
        let ids: Vec<Uuid> = comment_ids.iter().map(|id| id.into_uuid()).collect();

        let result = sqlx::query("DELETE FROM comments WHERE comment_id = ANY($1)")
            .bind(&ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> CommunityResult<u64> {
        let result = sqlx::query("DELETE FROM comments WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Group Repository Implementation
// ============================================================================

impl GroupRepository for PgCommunityRepository {
    async fn create(&self, group: &Group) -> CommunityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO groups (group_id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(group.group_id.as_uuid())
        .bind(group.name.as_str())
        .bind(group.description.as_deref())
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, group_id: &GroupId) -> CommunityResult<Option<Group>> {
        let Some(row) = sqlx::query_as::<_, GroupRow>(
            r#"
            SELECT group_id, name, description, created_at, updated_at
            FROM groups
            WHERE group_id = $1
            "#,
        )
        .bind(group_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let members = sqlx::query_scalar::<_, Uuid>(
            "SELECT account_id FROM group_members WHERE group_id = $1 ORDER BY joined_at ASC",
        )
        .bind(group_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_group(members)))
    }

    async fn add_member(
        &self,
        group_id: &GroupId,
        account_id: &AccountId,
    ) -> CommunityResult<Option<bool>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM groups WHERE group_id = $1)")
                .bind(group_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        if !exists {
            return Ok(None);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, account_id, joined_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (group_id, account_id) DO NOTHING
            "#,
        )
        .bind(group_id.as_uuid())
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await?;

        let added = result.rows_affected() > 0;
        if added {
            sqlx::query("UPDATE groups SET updated_at = NOW() WHERE group_id = $1")
                .bind(group_id.as_uuid())
                .execute(&self.pool)
                .await?;
        }

        Ok(Some(added))
    }
}

// ============================================================================
// Database Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    post_id: Uuid,
    title: String,
    content: String,
    tags: Vec<String>,
    author_id: Uuid,
    author_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl PostRow {
    fn into_summary(self) -> PostSummary {
        PostSummary {
            post_id: PostId::from_uuid(self.post_id),
            title: self.title,
            content: self.content,
            tags: self.tags,
            author_id: AccountId::from_uuid(self.author_id),
            author_name: self.author_name,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostDetailRow {
    #[sqlx(flatten)]
    post: PostRow,
    author_email: Option<String>,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    content: String,
    author_id: Uuid,
    author_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_view(self) -> CommentView {
        CommentView {
            comment_id: CommentId::from_uuid(self.comment_id),
            content: self.content,
            author_id: AccountId::from_uuid(self.author_id),
            author_name: self.author_name,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct GroupRow {
    group_id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl GroupRow {
    fn into_group(self, members: Vec<Uuid>) -> Group {
        Group {
            group_id: GroupId::from_uuid(self.group_id),
            name: GroupName::from_db(self.name),
            description: self.description,
            members: members.into_iter().map(AccountId::from_uuid).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
