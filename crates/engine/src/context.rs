use std::sync::Arc;

use bento_core::calendar::OrderWindow;
use bento_core::clock::BusinessClock;
use bento_core::principal::ActingPrincipal;
use bento_core::types::DbId;
use bento_db::repositories::SettingsRepo;
use bento_db::DbPool;
use bento_events::{AuditEvent, AuditSink};
use sqlx::PgExecutor;

/// Shared dependencies of every engine component.
#[derive(Clone)]
pub struct EngineContext {
    pub pool: DbPool,
    pub clock: BusinessClock,
    pub audit: Arc<dyn AuditSink>,
}

impl EngineContext {
    pub fn new(pool: DbPool, clock: BusinessClock, audit: Arc<dyn AuditSink>) -> Self {
        Self { pool, clock, audit }
    }

    /// The ordering window as of now, using the stored horizon.
    pub async fn order_window<'e>(&self, db: impl PgExecutor<'e>) -> Result<OrderWindow, sqlx::Error> {
        let settings = SettingsRepo::get(db).await?;
        Ok(OrderWindow::new(self.clock.now_local(), settings.max_days_ahead))
    }

    /// Record one audit entry. Call only after the write has committed.
    pub fn audit(
        &self,
        principal: &ActingPrincipal,
        action: &str,
        target_table: &str,
        target_id: Option<DbId>,
        details: serde_json::Value,
    ) {
        let mut event = AuditEvent::new(action, target_table)
            .with_actor(principal.actor_id)
            .with_details(details);
        if let Some(id) = target_id {
            event = event.with_target(id);
        }
        self.audit.record(event);
    }
}
