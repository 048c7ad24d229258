//! Account Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, audit contract
//! - `application/` - Use cases and application services
//! - `infra/` - Database, in-memory and audit sink implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Registration and email + password login
//! - Failed-login counting with lockout after 5 consecutive mismatches
//! - Role gate (`authorize`) with exact role matching
//! - Server-side sessions referenced by HMAC-signed cookie tokens
//! - Self-service profile and admin user management
//! - Audit trail of every login outcome and account change
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; clear text is zeroized after use
//! - Locked accounts are rejected before any password comparison
//! - The failed-login increment is a single atomic store operation

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountConfig;
pub use application::{authorize, require_session};
pub use domain::{AuditAction, AuditEvent, AuditSink, Role, SessionIdentity, record_audit};
pub use error::{AccessError, AccessResult};
pub use infra::{MemoryAccountStore, MemoryAuditSink, PgAccountRepository, PgAuditLog, TracingAuditSink};
pub use presentation::{AdminOnly, Authenticated, SessionLayerState, account_router, resolve_session};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
