//! Audit Sink Implementations

use std::sync::{Arc, Mutex};

use sqlx::PgPool;
use sqlx::types::Json;

use crate::domain::audit::{AuditEvent, AuditSink};
use crate::error::{AccessError, AccessResult};

/// Writes each event as a structured `tracing` record on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    async fn record(&self, event: &AuditEvent) -> AccessResult<()> {
        tracing::info!(
            target: "audit",
            action = event.action.as_str(),
            account_id = ?event.account_id.map(|id| id.to_string()),
            email = ?event.email,
            details = %event.details,
            "audit"
        );
        Ok(())
    }
}

/// Persists events to the `audit_logs` table.
#[derive(Clone)]
pub struct PgAuditLog {
    pool: PgPool,
}

impl PgAuditLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuditSink for PgAuditLog {
    async fn record(&self, event: &AuditEvent) -> AccessResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (action, account_id, email, details, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.action.as_str())
        .bind(event.account_id.map(|id| id.into_uuid()))
        .bind(event.email.as_deref())
        .bind(Json(&event.details))
        .bind(event.occurred_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Keeps events in memory for inspection.
#[derive(Clone, Default)]
pub struct MemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    async fn record(&self, event: &AuditEvent) -> AccessResult<()> {
        self.events
            .lock()
            .map_err(|_| AccessError::Internal("audit buffer poisoned".to_string()))?
            .push(event.clone());
        Ok(())
    }
}

/// Records to both sinks; the first failure is returned after both have run.
impl<A, B> AuditSink for (A, B)
where
    A: AuditSink + Sync,
    B: AuditSink + Sync,
{
    async fn record(&self, event: &AuditEvent) -> AccessResult<()> {
        let first = self.0.record(event).await;
        let second = self.1.record(event).await;
        first.and(second)
    }
}
