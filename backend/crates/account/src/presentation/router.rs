//! Account Router

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::audit::AuditSink;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::presentation::handlers::{self, AccountAppState};

/// Routes for registration, login, profile and admin user management.
///
/// Expects [`resolve_session`](crate::presentation::middleware::resolve_session)
/// to be layered on the enclosing router.
pub fn account_router<R, A>(repo: Arc<R>, audit: Arc<A>, config: Arc<AccountConfig>) -> Router
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let state = AccountAppState {
        repo,
        audit,
        config,
    };

    Router::new()
        .route("/auth/register", post(handlers::register::<R, A>))
        .route("/auth/login", post(handlers::login::<R, A>))
        .route("/auth/logout", post(handlers::logout::<R, A>))
        .route(
            "/profile",
            get(handlers::get_profile::<R, A>)
                .put(handlers::edit_profile::<R, A>)
                .delete(handlers::delete_profile::<R, A>),
        )
        .route("/admin/users", get(handlers::search_user::<R, A>))
        .route(
            "/admin/users/{id}",
            put(handlers::update_user::<R, A>).delete(handlers::delete_user::<R, A>),
        )
        .route(
            "/admin/users/{id}/unlock",
            post(handlers::unlock_user::<R, A>),
        )
        .with_state(state)
}
