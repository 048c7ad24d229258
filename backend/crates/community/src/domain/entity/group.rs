//! Group Entity

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_object::{AccountId, GroupId, group_name::GroupName};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub group_id: GroupId,
    pub name: GroupName,
    pub description: Option<String>,
    pub members: Vec<AccountId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: GroupName, description: Option<String>) -> Self {
        let now = Utc::now();

        Self {
            group_id: GroupId::new(),
            name,
            description: description.filter(|d| !d.trim().is_empty()),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns false when `account_id` already belongs to the group.
    pub fn add_member(&mut self, account_id: AccountId) -> bool {
        if self.members.contains(&account_id) {
            return false;
        }
        self.members.push(account_id);
        self.updated_at = Utc::now();
        true
    }
}
