use derive_more::Display;
use serde::Serialize;

use crate::error::{CommunityError, CommunityResult};

pub const GROUP_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: impl Into<String>) -> CommunityResult<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(CommunityError::validation("Group name is required."));
        }
        if trimmed.chars().count() > GROUP_NAME_MAX_CHARS {
            return Err(CommunityError::Validation(format!(
                "Group name must be at most {GROUP_NAME_MAX_CHARS} characters."
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
}
