//! Community Backend Module
//!
//! Posts, comments and groups for signed-in accounts, plus the admin
//! moderation tools. Sessions and roles come from the `account` crate.
//!
//! Layout follows the account crate:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::CommentRetention;
pub use error::{CommunityError, CommunityResult};
pub use infra::{MemoryCommunityStore, PgCommunityRepository};
pub use presentation::community_router;
