//! Community Error Types

use account::AccessError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::is_connectivity_error, kind::ErrorKind};
use thiserror::Error;

pub type CommunityResult<T> = Result<T, CommunityError>;

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("{0}")]
    Validation(String),

    #[error("Post not found.")]
    PostNotFound,

    #[error("Group not found.")]
    GroupNotFound,

    /// Missing session or wrong role
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommunityError {
    pub fn validation(message: impl Into<String>) -> Self {
        CommunityError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommunityError::Validation(_) => ErrorKind::BadRequest,
            CommunityError::PostNotFound | CommunityError::GroupNotFound => ErrorKind::NotFound,
            CommunityError::Access(e) => e.kind(),
            CommunityError::StoreUnavailable(e) if is_connectivity_error(e) => {
                ErrorKind::ServiceUnavailable
            }
            CommunityError::StoreUnavailable(_) | CommunityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            CommunityError::Validation(_) => None,
            CommunityError::PostNotFound => Some("/posts"),
            CommunityError::GroupNotFound => Some("/dashboard"),
            CommunityError::Access(e) => e.redirect(),
            CommunityError::StoreUnavailable(_) | CommunityError::Internal(_) => Some("/dashboard"),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        if let CommunityError::Access(e) = self {
            return e.to_app_error();
        }

        let app_error = match self {
            CommunityError::StoreUnavailable(_) | CommunityError::Internal(_) => {
                AppError::new(self.kind(), "An error occurred. Please try again later.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        };

        match self.redirect() {
            Some(target) => app_error.with_redirect(target),
            None => app_error,
        }
    }
}

impl IntoResponse for CommunityError {
    fn into_response(self) -> Response {
        match self {
            CommunityError::Access(e) => e.into_response(),
            other => {
                match &other {
                    CommunityError::StoreUnavailable(e) => {
                        tracing::error!(error = %e, "Community store error");
                    }
                    CommunityError::Internal(msg) => {
                        tracing::error!(message = %msg, "Community internal error");
                    }
                    _ => tracing::debug!(error = %other, "Community error"),
                }
                other.to_app_error().into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CommunityError::PostNotFound.to_string(), "Post not found.");
        assert_eq!(CommunityError::GroupNotFound.to_string(), "Group not found.");
        assert_eq!(
            CommunityError::Access(AccessError::Forbidden).to_string(),
            "You are not authorized to view that resource."
        );
    }

    #[test]
    fn test_access_errors_keep_their_mapping() {
        let err = CommunityError::from(AccessError::Unauthenticated);
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.redirect(), Some("/login"));

        let err = CommunityError::from(AccessError::Forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.redirect(), Some("/dashboard"));
    }

    #[test]
    fn test_store_errors_are_generic() {
        let err = CommunityError::StoreUnavailable(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(
            err.to_app_error().message(),
            "An error occurred. Please try again later."
        );

        let err = CommunityError::StoreUnavailable(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }
}
