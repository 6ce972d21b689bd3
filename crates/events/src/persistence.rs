//! Durable audit persistence service.
//!
//! [`AuditPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes every received [`AuditEvent`] to the
//! `audit_logs` table. It runs as a long-lived background task and shuts
//! down when the bus sender is dropped.

use tokio::sync::broadcast;
use bento_core::types::DbId;
use bento_db::models::audit::CreateAuditLog;
use bento_db::repositories::AuditLogRepo;
use bento_db::DbPool;

use crate::bus::AuditEvent;

/// Background service that persists audit events to the database.
pub struct AuditPersistence;

impl AuditPersistence {
    /// Run the persistence loop until the channel closes.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<AuditEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            action = %event.action,
                            "Failed to persist audit event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Audit persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, audit persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to `audit_logs`.
    pub async fn persist(pool: &DbPool, event: &AuditEvent) -> Result<DbId, sqlx::Error> {
        AuditLogRepo::insert(
            pool,
            &CreateAuditLog {
                actor_id: event.actor_id,
                action: event.action.clone(),
                target_table: event.target_table.clone(),
                target_id: event.target_id,
                details: event.details.clone(),
            },
        )
        .await
    }
}
