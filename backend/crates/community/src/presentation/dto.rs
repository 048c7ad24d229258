//! API DTOs

use account::SessionIdentity;
use serde::{Deserialize, Serialize};

use crate::domain::entity::post::{PostSummary, TagTotal};

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Comma-separated, e.g. `"rust, web"`
    #[serde(default)]
    pub tags: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvancedFilterRequest {
    pub keyword: Option<String>,
    pub tag: Option<String>,
}

/// A single id or a list of ids
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(id) => vec![id],
            OneOrMany::Many(ids) => ids,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteCommentsRequest {
    pub comment_ids: OneOrMany,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub user: SessionIdentity,
    pub posts: Vec<PostSummary>,
}

/// Outcome of a write, with the new record's id when one was created.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
    pub redirect: String,
}

impl ActionResponse {
    pub fn new(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            id: None,
            message: message.into(),
            redirect: redirect.into(),
        }
    }

    pub fn with_id(mut self, id: impl ToString) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
    pub message: String,
    pub redirect: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagTotalsResponse {
    pub totals: Vec<TagTotal>,
    pub message: String,
    pub redirect: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinGroupResponse {
    pub joined: bool,
    pub message: String,
    pub redirect: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_ids_one_or_many() {
        let one: BulkDeleteCommentsRequest =
            serde_json::from_str(r#"{"commentIds":"a"}"#).unwrap();
        assert_eq!(one.comment_ids.into_vec(), vec!["a"]);

        let many: BulkDeleteCommentsRequest =
            serde_json::from_str(r#"{"commentIds":["a","b"]}"#).unwrap();
        assert_eq!(many.comment_ids.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn test_action_response_omits_missing_id() {
        let json = serde_json::to_value(ActionResponse::new("ok", "/dashboard")).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["redirect"], "/dashboard");
    }
}
