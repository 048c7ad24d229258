//! Community Router

use std::sync::Arc;

use account::AuditSink;
use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::domain::repository::{CommentRepository, GroupRepository, PostRepository};
use crate::presentation::handlers::{self, CommunityAppState};

/// Posts, comments, groups and their admin routes.
///
/// Like the account routes, these read the caller from the session layer
/// installed on the enclosing router.
pub fn community_router<R, A>(repo: Arc<R>, audit: Arc<A>) -> Router
where
    R: PostRepository + CommentRepository + GroupRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let state = CommunityAppState { repo, audit };

    Router::new()
        .route("/dashboard", get(handlers::dashboard::<R, A>))
        .route(
            "/posts",
            get(handlers::list_posts::<R, A>).post(handlers::create_post::<R, A>),
        )
        .route(
            "/posts/advanced-filter",
            post(handlers::advanced_filter::<R, A>),
        )
        .route("/posts/{id}", get(handlers::get_post::<R, A>))
        .route("/posts/{id}/comments", post(handlers::add_comment::<R, A>))
        .route("/groups/{id}/members", post(handlers::join_group::<R, A>))
        .route("/admin/groups", post(handlers::create_group::<R, A>))
        .route(
            "/admin/posts/aggregation",
            post(handlers::snapshot_tag_totals::<R, A>),
        )
        .route("/admin/posts/{id}", delete(handlers::delete_post::<R, A>))
        .route(
            "/admin/comments/bulk-delete",
            post(handlers::bulk_delete_comments::<R, A>),
        )
        .with_state(state)
}
