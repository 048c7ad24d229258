//! Account Entity

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::value_object::{
    AccountId,
    account_name::AccountName,
    email::Email,
    login_status::{LoginCounters, LoginStatus},
    role::Role,
};

/// A registrant. `password` only ever holds the Argon2id hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub name: AccountName,
    pub email: Email,
    pub password: HashedPassword,
    pub role: Role,
    pub failed_logins: u32,
    pub locked: bool,
    /// Stored file path reference (e.g. `/uploads/1700000000-me.png`)
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(name: AccountName, email: Email, password: HashedPassword, role: Role) -> Self {
        let now = Utc::now();

        Self {
            account_id: AccountId::new(),
            name,
            email,
            password,
            role,
            failed_logins: 0,
            locked: false,
            profile_picture: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn login_status(&self) -> LoginStatus {
        LoginStatus::from_counters(self.failed_logins, self.locked)
    }

    pub fn apply_login_status(&mut self, status: LoginStatus) {
        let counters = LoginCounters::from(status);
        self.failed_logins = counters.failed_logins;
        self.locked = counters.locked;
        self.updated_at = Utc::now();
    }

    /// Administrative unlock: back to `Active(0)`.
    pub fn unlock(&mut self) {
        self.apply_login_status(LoginStatus::default());
    }

    /// Snapshot carried by the session after a successful login.
    pub fn identity(&self) -> SessionIdentity {
        SessionIdentity {
            account_id: self.account_id,
            name: self.name.as_str().to_string(),
            email: self.email.as_str().to_string(),
            role: self.role,
            profile_picture: self.profile_picture.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
