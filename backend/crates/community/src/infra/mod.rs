//! Infrastructure Layer

pub mod memory;
pub mod postgres;

pub use memory::MemoryCommunityStore;
pub use postgres::PgCommunityRepository;
