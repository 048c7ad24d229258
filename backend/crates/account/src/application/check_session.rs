//! Check Session Use Case
//!
//! Turns a cookie token back into the Session Identity it was issued for.

use std::sync::Arc;

use platform::crypto::verify_token;
use uuid::Uuid;

use crate::application::config::AccountConfig;
use crate::domain::entity::{auth_session::AuthSession, session_identity::SessionIdentity};
use crate::domain::repository::SessionRepository;
use crate::error::{AccessError, AccessResult};

pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository + Sync,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// `Ok(None)` for a missing, forged, unknown or expired token.
    /// Store failures are still reported.
    pub async fn resolve(&self, session_token: &str) -> AccessResult<Option<SessionIdentity>> {
        match self.get_session(session_token).await {
            Ok(session) => Ok(Some(session.identity)),
            Err(AccessError::Unauthenticated) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_session(&self, session_token: &str) -> AccessResult<AuthSession> {
        let session_id = self.parse_session_token(session_token)?;

        let session = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(AccessError::Unauthenticated)?;

        if session.is_expired() {
            self.session_repo.delete(session_id).await?;
            tracing::debug!(session_id = %session_id, "Expired session removed");
            return Err(AccessError::Unauthenticated);
        }

        Ok(session)
    }

    /// Verify the HMAC and parse the session id.
    pub fn parse_session_token(&self, token: &str) -> AccessResult<Uuid> {
        let payload = verify_token(&self.config.session_secret, token).ok_or_else(|| {
            tracing::warn!("Session token signature mismatch");
            AccessError::Unauthenticated
        })?;

        payload.parse().map_err(|_| AccessError::Unauthenticated)
    }
}
