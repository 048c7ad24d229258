use derive_more::Display;
use serde::Serialize;

use crate::error::{CommunityError, CommunityResult};

pub const POST_TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PostTitle(String);

impl PostTitle {
    pub fn new(title: impl Into<String>) -> CommunityResult<Self> {
        let title = title.into();
        let trimmed = title.trim();

        if trimmed.is_empty() {
            return Err(CommunityError::validation("Title is required."));
        }
        if trimmed.chars().count() > POST_TITLE_MAX_CHARS {
            return Err(CommunityError::Validation(format!(
                "Title must be at most {POST_TITLE_MAX_CHARS} characters."
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    pub fn from_db(title: impl Into<String>) -> Self {
        Self(title.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
