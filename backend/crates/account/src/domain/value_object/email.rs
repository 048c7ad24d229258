//! Email Value Object
//!
//! The login identifier. Kept byte-for-byte as submitted: lookups are exact
//! matches, so `Alice@example.com` and `alice@example.com` are two accounts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AccessError, AccessResult, FILL_ALL_FIELDS};

/// Maximum email length (per RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AccessResult<Self> {
        let email = email.into();

        if email.is_empty() {
            return Err(AccessError::validation(FILL_ALL_FIELDS));
        }

        if email.len() > EMAIL_MAX_LENGTH {
            return Err(AccessError::Validation(format!(
                "Email must be at most {EMAIL_MAX_LENGTH} characters."
            )));
        }

        Ok(Self(email))
    }

    /// Key for finding an existing account. Only emptiness is checked: an
    /// over-long address is not rejected, it just matches nothing.
    pub fn lookup(email: impl Into<String>) -> AccessResult<Self> {
        let email = email.into();

        if email.is_empty() {
            return Err(AccessError::validation(FILL_ALL_FIELDS));
        }

        Ok(Self(email))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
