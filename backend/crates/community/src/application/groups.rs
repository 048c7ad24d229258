//! Group Use Case

use std::sync::Arc;

use account::{AuditAction, AuditSink, Role, SessionIdentity, authorize, record_audit};
use serde_json::json;

use crate::application::actor_event;
use crate::domain::entity::group::Group;
use crate::domain::repository::GroupRepository;
use crate::domain::value_object::{GroupId, group_name::GroupName};
use crate::error::{CommunityError, CommunityResult};

pub struct CreateGroupInput {
    pub name: String,
    pub description: Option<String>,
}

pub struct GroupUseCase<R, A>
where
    R: GroupRepository,
    A: AuditSink,
{
    groups: Arc<R>,
    audit: Arc<A>,
}

impl<R, A> GroupUseCase<R, A>
where
    R: GroupRepository + Sync,
    A: AuditSink + Sync,
{
    pub fn new(groups: Arc<R>, audit: Arc<A>) -> Self {
        Self { groups, audit }
    }

    /// Admin only
    pub async fn create(
        &self,
        actor: &SessionIdentity,
        input: CreateGroupInput,
    ) -> CommunityResult<Group> {
        authorize(Some(actor), Role::Admin)?;

        let group = Group::new(GroupName::new(input.name)?, input.description);
        self.groups.create(&group).await?;

        tracing::info!(
            group_id = %group.group_id,
            name = %group.name,
            admin = %actor.email,
            "Group created"
        );
        record_audit(
            self.audit.as_ref(),
            actor_event(actor, AuditAction::GroupCreated).details(json!({
                "group_id": group.group_id,
                "name": group.name,
            })),
        )
        .await;

        Ok(group)
    }

    /// Joining twice is a no-op. Returns whether the caller was newly added.
    pub async fn join(&self, member: &SessionIdentity, group_id: &GroupId) -> CommunityResult<bool> {
        let added = self
            .groups
            .add_member(group_id, &member.account_id)
            .await?
            .ok_or(CommunityError::GroupNotFound)?;

        tracing::info!(group_id = %group_id, member = %member.email, added, "Group joined");
        if added {
            record_audit(
                self.audit.as_ref(),
                actor_event(member, AuditAction::GroupJoined)
                    .details(json!({ "group_id": group_id })),
            )
            .await;
        }

        Ok(added)
    }
}
