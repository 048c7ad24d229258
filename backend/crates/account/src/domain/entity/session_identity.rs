use serde::{Deserialize, Serialize};

use crate::domain::value_object::{AccountId, role::Role};

/// Who is making the request.
///
/// Taken at login and passed explicitly into every guarded operation. Stored
/// as JSON alongside the server-side session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub account_id: AccountId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub profile_picture: Option<String>,
}

impl SessionIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
