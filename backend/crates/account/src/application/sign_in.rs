//! Sign In Use Case
//!
//! Authenticates and opens a server-side session.

use std::sync::Arc;

use platform::crypto::sign_token;

use crate::application::authenticate::{AuthenticateInput, AuthenticateUseCase};
use crate::application::config::AccountConfig;
use crate::domain::audit::AuditSink;
use crate::domain::entity::{auth_session::AuthSession, session_identity::SessionIdentity};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::error::{AccessError, AccessResult};

pub struct SignInOutput {
    /// Signed token for the session cookie
    pub session_token: String,
    pub identity: SessionIdentity,
}

pub struct SignInUseCase<R, A>
where
    R: AccountRepository + SessionRepository,
    A: AuditSink,
{
    repo: Arc<R>,
    audit: Arc<A>,
    config: Arc<AccountConfig>,
}

impl<R, A> SignInUseCase<R, A>
where
    R: AccountRepository + SessionRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(repo: Arc<R>, audit: Arc<A>, config: Arc<AccountConfig>) -> Self {
        Self {
            repo,
            audit,
            config,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AccessResult<SignInOutput> {
        let identity = AuthenticateUseCase::new(
            self.repo.clone(),
            self.audit.clone(),
            self.config.clone(),
        )
        .execute(input)
        .await?;

        let ttl = chrono::Duration::from_std(self.config.session_ttl)
            .map_err(|e| AccessError::Internal(format!("Invalid session TTL: {e}")))?;
        let session = AuthSession::new(identity.clone(), ttl);

        SessionRepository::create(self.repo.as_ref(), &session).await?;

        let session_token = sign_token(&self.config.session_secret, &session.session_id.to_string());

        tracing::info!(
            account_id = %identity.account_id,
            session_id = %session.session_id,
            "Session opened"
        );

        Ok(SignInOutput {
            session_token,
            identity,
        })
    }
}
