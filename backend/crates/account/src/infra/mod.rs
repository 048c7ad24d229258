//! Infrastructure Layer
//!
//! Database implementations, the in-memory store and audit sinks.

pub mod audit;
pub mod memory;
pub mod postgres;

pub use audit::{MemoryAuditSink, PgAuditLog, TracingAuditSink};
pub use memory::MemoryAccountStore;
pub use postgres::PgAccountRepository;
