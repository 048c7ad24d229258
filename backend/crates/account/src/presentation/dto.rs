//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::{account::Account, session_identity::SessionIdentity};

// ============================================================================
// Register / Login
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// `"user"` (default) or `"admin"`
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub account_id: String,
    pub message: String,
    pub redirect: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: SessionIdentity,
    pub message: String,
    pub redirect: &'static str,
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for ProfileResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            name: account.name.to_string(),
            email: account.email.to_string(),
            role: account.role.code().to_string(),
            profile_picture: account.profile_picture.clone(),
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProfileRequest {
    pub name: Option<String>,
    /// Path of an already-stored upload
    pub profile_picture: Option<String>,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct UserSearchQuery {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub account_id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub failed_logins: u32,
    pub locked: bool,
    pub profile_picture: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Account> for AdminUserResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id.to_string(),
            name: account.name.to_string(),
            email: account.email.to_string(),
            role: account.role.code().to_string(),
            failed_logins: account.failed_logins,
            locked: account.locked,
            profile_picture: account.profile_picture.clone(),
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResponse {
    pub found_user: Option<AdminUserResponse>,
}

// ============================================================================
// Shared
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    pub redirect: &'static str,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>, redirect: &'static str) -> Self {
        Self {
            message: message.into(),
            redirect,
        }
    }
}
