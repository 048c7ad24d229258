//! Role gate applied to guarded operations. Pure, no side effects.

use crate::domain::entity::session_identity::SessionIdentity;
use crate::domain::value_object::role::Role;
use crate::error::{AccessError, AccessResult};

/// Succeeds for any present identity.
pub fn require_session(identity: Option<&SessionIdentity>) -> AccessResult<&SessionIdentity> {
    identity.ok_or(AccessError::Unauthenticated)
}

/// Succeeds only when the identity's role equals `required`. There is no
/// hierarchy: an admin does not pass a `Role::User` check.
pub fn authorize(
    identity: Option<&SessionIdentity>,
    required: Role,
) -> AccessResult<&SessionIdentity> {
    let identity = require_session(identity)?;

    if identity.role != required {
        tracing::debug!(
            account_id = %identity.account_id,
            role = %identity.role,
            required = %required,
            "Role mismatch"
        );
        return Err(AccessError::Forbidden);
    }

    Ok(identity)
}
