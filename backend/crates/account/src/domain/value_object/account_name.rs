//! Display name shown next to posts and in the dashboard greeting.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AccessError, AccessResult, FILL_ALL_FIELDS};

pub const ACCOUNT_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct AccountName(String);

impl AccountName {
    /// Surrounding whitespace is dropped; a blank name is rejected.
    pub fn new(name: impl Into<String>) -> AccessResult<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(AccessError::validation(FILL_ALL_FIELDS));
        }

        if trimmed.chars().count() > ACCOUNT_NAME_MAX_CHARS {
            return Err(AccessError::Validation(format!(
                "Name must be at most {ACCOUNT_NAME_MAX_CHARS} characters."
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}
