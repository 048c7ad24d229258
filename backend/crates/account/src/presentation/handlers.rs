//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::application::{
    AdminUpdateInput, AdminUseCase, AuthenticateInput, ProfileEdit, ProfileUseCase,
    RegisterInput, RegisterUseCase, SignInUseCase, SignOutUseCase,
};
use crate::domain::audit::AuditSink;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, role::Role};
use crate::error::{AccessError, AccessResult};
use crate::presentation::dto::{
    AdminUpdateRequest, AdminUserResponse, EditProfileRequest, LoginRequest, LoginResponse,
    MessageResponse, ProfileResponse, RegisterRequest, RegisterResponse, UserSearchQuery,
    UserSearchResponse,
};
use crate::presentation::middleware::{AdminOnly, Authenticated};

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R, A>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub audit: Arc<A>,
    pub config: Arc<AccountConfig>,
}

// ============================================================================
// Register / Login / Logout
// ============================================================================

/// POST /api/auth/register
pub async fn register<R, A>(
    State(state): State<AccountAppState<R, A>>,
    Json(req): Json<RegisterRequest>,
) -> AccessResult<(StatusCode, Json<RegisterResponse>)>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let role = req
        .role
        .as_deref()
        .filter(|r| !r.is_empty())
        .map(str::parse::<Role>)
        .transpose()?;

    let use_case = RegisterUseCase::new(state.repo.clone(), state.audit.clone(), state.config.clone());

    let account_id = use_case
        .execute(RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: account_id.to_string(),
            message: "Registration successful. Please log in.".to_string(),
            redirect: "/login",
        }),
    ))
}

/// POST /api/auth/login
pub async fn login<R, A>(
    State(state): State<AccountAppState<R, A>>,
    Json(req): Json<LoginRequest>,
) -> AccessResult<impl IntoResponse>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.audit.clone(), state.config.clone());

    let output = use_case
        .execute(AuthenticateInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = state
        .config
        .session_cookie
        .issue_header(&output.session_token, state.config.session_ttl.as_secs());
    let message = format!("Welcome back, {}!", output.identity.name);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            user: output.identity,
            message,
            redirect: "/dashboard",
        }),
    ))
}

/// POST /api/auth/logout
pub async fn logout<R, A>(
    State(state): State<AccountAppState<R, A>>,
    headers: HeaderMap,
) -> impl IntoResponse
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    if let Some(token) = state.config.session_cookie.read(&headers) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // Ignore errors - just clear the cookie
        if let Err(e) = use_case.execute(&token).await {
            tracing::debug!(error = %e, "Sign out without a live session");
        }
    }

    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.config.session_cookie.clear())],
        Json(MessageResponse::new("You have been logged out.", "/login")),
    )
}

// ============================================================================
// Profile
// ============================================================================

/// GET /api/profile
pub async fn get_profile<R, A>(
    State(state): State<AccountAppState<R, A>>,
    Authenticated(identity): Authenticated,
) -> AccessResult<Json<ProfileResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let account = ProfileUseCase::new(state.repo.clone(), state.audit.clone())
        .view(&identity)
        .await?;

    Ok(Json(ProfileResponse::from(&account)))
}

/// PUT /api/profile
pub async fn edit_profile<R, A>(
    State(state): State<AccountAppState<R, A>>,
    Authenticated(identity): Authenticated,
    Json(req): Json<EditProfileRequest>,
) -> AccessResult<Json<MessageResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    ProfileUseCase::new(state.repo.clone(), state.audit.clone())
        .edit(
            &identity,
            ProfileEdit {
                name: req.name,
                profile_picture: req.profile_picture,
            },
        )
        .await?;

    Ok(Json(MessageResponse::new(
        "Profile updated successfully.",
        "/profile",
    )))
}

/// DELETE /api/profile
pub async fn delete_profile<R, A>(
    State(state): State<AccountAppState<R, A>>,
    Authenticated(identity): Authenticated,
) -> AccessResult<impl IntoResponse>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    ProfileUseCase::new(state.repo.clone(), state.audit.clone())
        .delete(&identity)
        .await?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, state.config.session_cookie.clear())],
        Json(MessageResponse::new("Your account has been deleted.", "/register")),
    ))
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/users?email=
pub async fn search_user<R, A>(
    State(state): State<AccountAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Query(query): Query<UserSearchQuery>,
) -> AccessResult<Json<UserSearchResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    // No email: empty search form
    let Some(email) = query.email.filter(|e| !e.is_empty()) else {
        return Ok(Json(UserSearchResponse { found_user: None }));
    };

    let account = AdminUseCase::new(state.repo.clone(), state.audit.clone())
        .find_by_email(&admin, &email)
        .await?;

    Ok(Json(UserSearchResponse {
        found_user: Some(AdminUserResponse::from(&account)),
    }))
}

/// PUT /api/admin/users/{id}
pub async fn update_user<R, A>(
    State(state): State<AccountAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Path(account_id): Path<String>,
    Json(req): Json<AdminUpdateRequest>,
) -> AccessResult<Json<AdminUserResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let input = AdminUpdateInput {
        account_id: parse_account_id(&account_id)?,
        name: req.name,
        email: req.email,
        role: req.role.parse()?,
    };

    let account = AdminUseCase::new(state.repo.clone(), state.audit.clone())
        .update(&admin, input)
        .await?;

    Ok(Json(AdminUserResponse::from(&account)))
}

/// DELETE /api/admin/users/{id}
pub async fn delete_user<R, A>(
    State(state): State<AccountAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Path(account_id): Path<String>,
) -> AccessResult<Json<MessageResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let account_id = parse_account_id(&account_id)?;

    AdminUseCase::new(state.repo.clone(), state.audit.clone())
        .delete(&admin, &account_id)
        .await?;

    Ok(Json(MessageResponse::new(
        "User deleted successfully.",
        "/admin/users",
    )))
}

/// POST /api/admin/users/{id}/unlock
pub async fn unlock_user<R, A>(
    State(state): State<AccountAppState<R, A>>,
    AdminOnly(admin): AdminOnly,
    Path(account_id): Path<String>,
) -> AccessResult<Json<AdminUserResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    A: AuditSink + Clone + Send + Sync + 'static,
{
    let account_id = parse_account_id(&account_id)?;

    let account = AdminUseCase::new(state.repo.clone(), state.audit.clone())
        .unlock(&admin, &account_id)
        .await?;

    Ok(Json(AdminUserResponse::from(&account)))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Malformed ids cannot name an account.
fn parse_account_id(raw: &str) -> AccessResult<AccountId> {
    raw.parse().map_err(|_| AccessError::UserNotFound)
}
