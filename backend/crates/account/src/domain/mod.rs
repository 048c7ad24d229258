//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the audit contract.

pub mod audit;
pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use audit::{AuditAction, AuditEvent, AuditSink, record_audit};
pub use entity::{account::Account, auth_session::AuthSession, session_identity::SessionIdentity};
pub use repository::{AccountRepository, SessionRepository};
pub use value_object::{
    AccountId,
    login_status::{CounterUpdate, LOCK_THRESHOLD, LoginCounters, LoginStatus},
    role::Role,
};
