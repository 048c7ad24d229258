//! Account Error Types
//!
//! Failure outcomes of the access guard and the account use cases. Each variant
//! maps onto the unified `kernel::error::AppError`, carrying the message shown
//! to the user and the page the client should go back to.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, conversions::is_connectivity_error, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Account-specific result type alias
pub type AccessResult<T> = Result<T, AccessError>;

pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";

#[derive(Debug, Error)]
pub enum AccessError {
    /// Input rejected before touching the store
    #[error("{0}")]
    Validation(String),

    #[error("Email already registered.")]
    DuplicateEmail,

    /// No account with the submitted login email
    #[error("Email not registered.")]
    NotFound,

    /// Lookup by id or admin search found nothing
    #[error("User not found.")]
    UserNotFound,

    #[error("Your account is locked due to too many failed login attempts.")]
    AccountLocked,

    #[error("Incorrect password.")]
    InvalidPassword,

    #[error("Please log in to continue.")]
    Unauthenticated,

    #[error("You are not authorized to view that resource.")]
    Forbidden,

    /// Backing store failed or is unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccessError {
    pub fn validation(message: impl Into<String>) -> Self {
        AccessError::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::Validation(_) => ErrorKind::BadRequest,
            AccessError::DuplicateEmail => ErrorKind::Conflict,
            AccessError::NotFound | AccessError::UserNotFound => ErrorKind::NotFound,
            AccessError::AccountLocked => ErrorKind::Locked,
            AccessError::InvalidPassword | AccessError::Unauthenticated => ErrorKind::Unauthorized,
            AccessError::Forbidden => ErrorKind::Forbidden,
            AccessError::StoreUnavailable(e) if is_connectivity_error(e) => {
                ErrorKind::ServiceUnavailable
            }
            AccessError::StoreUnavailable(_) | AccessError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Where the client should navigate after this failure
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            AccessError::Validation(_) | AccessError::DuplicateEmail => Some("/register"),
            AccessError::NotFound
            | AccessError::AccountLocked
            | AccessError::InvalidPassword
            | AccessError::Unauthenticated => Some("/login"),
            AccessError::UserNotFound => Some("/admin/users"),
            AccessError::Forbidden => Some("/dashboard"),
            AccessError::StoreUnavailable(_) | AccessError::Internal(_) => None,
        }
    }

    /// Convert to AppError. Server-side details stay in the log.
    pub fn to_app_error(&self) -> AppError {
        let app_error = match self {
            AccessError::StoreUnavailable(_) | AccessError::Internal(_) => {
                AppError::new(self.kind(), "An error occurred. Please try again later.")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        };

        match self.redirect() {
            Some(target) => app_error.with_redirect(target),
            None => app_error,
        }
    }

    fn log(&self) {
        match self {
            AccessError::StoreUnavailable(e) => {
                tracing::error!(error = %e, "Account store error");
            }
            AccessError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccessError::InvalidPassword => {
                tracing::warn!("Invalid login attempt");
            }
            AccessError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            AccessError::Forbidden => {
                tracing::warn!("Role check rejected request");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<PasswordPolicyError> for AccessError {
    fn from(err: PasswordPolicyError) -> Self {
        match err {
            PasswordPolicyError::Empty => AccessError::validation(FILL_ALL_FIELDS),
            PasswordPolicyError::TooShort { min, .. } => {
                AccessError::Validation(format!("Password must be at least {min} characters."))
            }
        }
    }
}

impl From<PasswordHashError> for AccessError {
    fn from(err: PasswordHashError) -> Self {
        AccessError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_login_page_text() {
        assert_eq!(AccessError::NotFound.to_string(), "Email not registered.");
        assert_eq!(AccessError::InvalidPassword.to_string(), "Incorrect password.");
        assert_eq!(
            AccessError::AccountLocked.to_string(),
            "Your account is locked due to too many failed login attempts."
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(AccessError::AccountLocked.kind(), ErrorKind::Locked);
        assert_eq!(AccessError::Forbidden.kind(), ErrorKind::Forbidden);
        assert_eq!(AccessError::DuplicateEmail.kind(), ErrorKind::Conflict);
        assert_eq!(
            AccessError::StoreUnavailable(sqlx::Error::PoolTimedOut).kind(),
            ErrorKind::ServiceUnavailable
        );
        assert_eq!(
            AccessError::StoreUnavailable(sqlx::Error::RowNotFound).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_app_error_carries_redirect() {
        let app_error = AccessError::Forbidden.to_app_error();
        assert_eq!(app_error.redirect(), Some("/dashboard"));
        assert_eq!(app_error.status_code(), 403);
    }

    #[test]
    fn test_store_error_detail_is_not_exposed() {
        let app_error = AccessError::StoreUnavailable(sqlx::Error::PoolTimedOut).to_app_error();
        assert!(!app_error.message().contains("pool"));
        assert_eq!(app_error.redirect(), None);
    }

    #[test]
    fn test_password_policy_conversion() {
        let err: AccessError = PasswordPolicyError::TooShort { min: 6, actual: 3 }.into();
        assert_eq!(err.to_string(), "Password must be at least 6 characters.");

        let err: AccessError = PasswordPolicyError::Empty.into();
        assert_eq!(err.to_string(), FILL_ALL_FIELDS);
    }
}
