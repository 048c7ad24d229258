//! Sign Out Use Case

use std::sync::Arc;

use crate::application::check_session::CheckSessionUseCase;
use crate::application::config::AccountConfig;
use crate::domain::repository::SessionRepository;
use crate::error::AccessResult;

pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AccountConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository + Sync,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AccountConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, session_token: &str) -> AccessResult<()> {
        let session_id = CheckSessionUseCase::new(self.session_repo.clone(), self.config.clone())
            .parse_session_token(session_token)?;

        self.session_repo.delete(session_id).await?;

        tracing::info!(session_id = %session_id, "Session closed");

        Ok(())
    }
}
