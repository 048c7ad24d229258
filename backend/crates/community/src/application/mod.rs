//! Application Layer
//!
//! Use cases for posts, comments, groups and moderation.

pub mod add_comment;
pub mod advanced_filter;
pub mod browse_posts;
pub mod create_post;
pub mod groups;
pub mod moderation;
pub mod retention;

use account::{AuditAction, AuditEvent, SessionIdentity};

pub use add_comment::AddCommentUseCase;
pub use advanced_filter::{AdvancedFilterUseCase, FilterOutcome};
pub use browse_posts::{BrowsePostsUseCase, DASHBOARD_POST_LIMIT};
pub use create_post::{CreatePostInput, CreatePostUseCase};
pub use groups::{CreateGroupInput, GroupUseCase};
pub use moderation::ModerationUseCase;
pub use retention::CommentRetention;

/// Audit event attributed to the acting session.
pub(crate) fn actor_event(actor: &SessionIdentity, action: AuditAction) -> AuditEvent {
    AuditEvent::new(action)
        .account(actor.account_id)
        .email(actor.email.clone())
}
