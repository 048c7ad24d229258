//! Session Middleware and Extractors
//!
//! `resolve_session` runs once per request and, when the cookie carries a valid
//! token, stores the [`SessionIdentity`] in the request extensions. Handlers
//! then ask for it through [`Authenticated`] or [`AdminOnly`].

use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::Request;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::authorize::{authorize, require_session};
use crate::application::config::AccountConfig;
use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::role::Role;
use crate::error::AccessError;

/// Middleware state
#[derive(Clone)]
pub struct SessionLayerState<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub sessions: Arc<S>,
    pub config: Arc<AccountConfig>,
}

/// Attach the caller's identity, if any. Never rejects an anonymous request.
pub async fn resolve_session<S>(
    State(state): State<SessionLayerState<S>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AccessError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = state.config.session_cookie.read(req.headers()) {
        let use_case = CheckSessionUseCase::new(state.sessions.clone(), state.config.clone());
        if let Some(identity) = use_case.resolve(&token).await? {
            req.extensions_mut().insert(identity);
        }
    }

    Ok(next.run(req).await)
}

/// Any signed-in account
#[derive(Debug, Clone)]
pub struct Authenticated(pub SessionIdentity);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        require_session(parts.extensions.get::<SessionIdentity>())
            .cloned()
            .map(Authenticated)
    }
}

/// A signed-in account whose role is exactly `Role::Admin`
#[derive(Debug, Clone)]
pub struct AdminOnly(pub SessionIdentity);

impl<S> FromRequestParts<S> for AdminOnly
where
    S: Send + Sync,
{
    type Rejection = AccessError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorize(parts.extensions.get::<SessionIdentity>(), Role::Admin)
            .cloned()
            .map(AdminOnly)
    }
}
