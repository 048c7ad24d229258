//! HTTP Handlers

use std::sync::Arc;

use account::{AdminOnly, AuditSink, Authenticated};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::application::{
    AddCommentUseCase, AdvancedFilterUseCase, BrowsePostsUseCase, CreateGroupInput,
    CreatePostInput, CreatePostUseCase, DASHBOARD_POST_LIMIT, FilterOutcome, GroupUseCase,
    ModerationUseCase,
};
use crate::domain::entity::post::{PostDetail, PostFilter};
use crate::domain::repository::{CommentRepository, GroupRepository, PostRepository};
use crate::domain::value_object::{CommentId, GroupId, PostId};
use crate::error::{CommunityError, CommunityResult};
use crate::presentation::dto::{
    ActionResponse, AddCommentRequest, AdvancedFilterRequest, BulkDeleteCommentsRequest,
    BulkDeleteResponse, CreateGroupRequest, CreatePostRequest, DashboardResponse,
    JoinGroupResponse, PostListResponse, TagTotalsResponse,
};

#[derive(Clone)]
pub struct CommunityAppState<R, A>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub audit: Arc<A>,
}

// ============================================================================
// Dashboard / Posts
// ============================================================================

/// GET /api/dashboard
pub async fn dashboard<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
) -> CommunityResult<Json<DashboardResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let posts = BrowsePostsUseCase::new(state.repo.clone())
        .recent(&identity, DASHBOARD_POST_LIMIT)
        .await?;

    Ok(Json(DashboardResponse {
        user: identity,
        posts,
    }))
}

/// GET /api/posts
pub async fn list_posts<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
) -> CommunityResult<Json<PostListResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let posts = BrowsePostsUseCase::new(state.repo.clone())
        .list(&identity)
        .await?;

    Ok(Json(PostListResponse { posts }))
}

/// POST /api/posts
pub async fn create_post<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Json(req): Json<CreatePostRequest>,
) -> CommunityResult<(StatusCode, Json<ActionResponse>)>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let post_id = CreatePostUseCase::new(state.repo.clone(), state.audit.clone())
        .execute(
            &identity,
            CreatePostInput {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new("Post created successfully.", "/dashboard").with_id(post_id)),
    ))
}

/// GET /api/posts/{id}
pub async fn get_post<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Path(post_id): Path<String>,
) -> CommunityResult<Json<PostDetail>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let detail = BrowsePostsUseCase::new(state.repo.clone())
        .get(&identity, &post_id)
        .await?;

    Ok(Json(detail))
}

/// POST /api/posts/{id}/comments
pub async fn add_comment<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Path(post_id): Path<String>,
    Json(req): Json<AddCommentRequest>,
) -> CommunityResult<(StatusCode, Json<ActionResponse>)>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    let comment_id = AddCommentUseCase::new(state.repo.clone(), state.audit.clone())
        .execute(&identity, &post_id, req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(
            ActionResponse::new("Comment added successfully.", format!("/posts/{post_id}"))
                .with_id(comment_id),
        ),
    ))
}

/// POST /api/posts/advanced-filter
pub async fn advanced_filter<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Json(req): Json<AdvancedFilterRequest>,
) -> CommunityResult<Json<FilterOutcome>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let outcome = AdvancedFilterUseCase::new(state.repo.clone(), state.audit.clone())
        .execute(&identity, PostFilter::new(req.keyword, req.tag))
        .await?;

    Ok(Json(outcome))
}

// ============================================================================
// Groups
// ============================================================================

/// POST /api/groups/{id}/members
pub async fn join_group<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Path(group_id): Path<String>,
) -> CommunityResult<Json<JoinGroupResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let group_id: GroupId = group_id.parse().map_err(|_| CommunityError::GroupNotFound)?;

    let joined = GroupUseCase::new(state.repo.clone(), state.audit.clone())
        .join(&identity, &group_id)
        .await?;

    let message = if joined {
        "You have joined the group."
    } else {
        "You are already a member of this group."
    };

    Ok(Json(JoinGroupResponse {
        joined,
        message: message.to_string(),
        redirect: "/dashboard",
    }))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /api/admin/groups
pub async fn create_group<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Json(req): Json<CreateGroupRequest>,
) -> CommunityResult<(StatusCode, Json<ActionResponse>)>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let group = GroupUseCase::new(state.repo.clone(), state.audit.clone())
        .create(
            &admin,
            CreateGroupInput {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::new("Group created successfully.", "/dashboard").with_id(group.group_id)),
    ))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete_post<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Path(post_id): Path<String>,
) -> CommunityResult<Json<ActionResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let post_id = parse_post_id(&post_id)?;

    ModerationUseCase::new(state.repo.clone(), state.audit.clone())
        .delete_post(&admin, &post_id)
        .await?;

    Ok(Json(ActionResponse::new("Post deleted successfully.", "/posts")))
}

/// POST /api/admin/comments/bulk-delete
pub async fn bulk_delete_comments<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Json(req): Json<BulkDeleteCommentsRequest>,
) -> CommunityResult<Json<BulkDeleteResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let comment_ids = req
        .comment_ids
        .into_vec()
        .iter()
        .map(|id| id.parse::<CommentId>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| CommunityError::validation("Invalid comment id."))?;

    let deleted = ModerationUseCase::new(state.repo.clone(), state.audit.clone())
        .bulk_delete_comments(&admin, &comment_ids)
        .await?;

    Ok(Json(BulkDeleteResponse {
        deleted,
        message: "Selected comments deleted successfully.".to_string(),
        redirect: "/posts",
    }))
}

/// POST /api/admin/posts/aggregation
pub async fn snapshot_tag_totals<R, A>(
    State(state): State<CommunityAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
) -> CommunityResult<Json<TagTotalsResponse>>
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let totals = ModerationUseCase::new(state.repo.clone(), state.audit.clone())
        .snapshot_tag_totals(&admin)
        .await?;

    Ok(Json(TagTotalsResponse {
        totals,
        message: "Tag totals computed and saved.".to_string(),
        redirect: "/dashboard",
    }))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn parse_post_id(raw: &str) -> CommunityResult<PostId> {
    raw.parse().map_err(|_| CommunityError::PostNotFound)
}
