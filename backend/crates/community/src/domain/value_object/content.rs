//! Body text of a post or comment. Kept as written, only blank input is refused.

use derive_more::Display;
use serde::Serialize;

use crate::error::{CommunityError, CommunityResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Content(String);

impl Content {
    pub fn new(content: impl Into<String>) -> CommunityResult<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(CommunityError::validation("Content is required."));
        }
        Ok(Self(content))
    }

    #[inline]
    pub fn from_db(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.0.to_lowercase().contains(term)
    }
}
