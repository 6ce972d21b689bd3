//! The audit port.
//!
//! Ledgers call [`AuditSink::record`] after their transaction commits.
//! Recording never fails from the caller's point of view; delivery problems
//! are logged by the implementation.

use crate::bus::{AuditEvent, EventBus};

pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

impl AuditSink for EventBus {
    fn record(&self, event: AuditEvent) {
        tracing::debug!(
            action = %event.action,
            target_table = %event.target_table,
            target_id = ?event.target_id,
            "Audit event published"
        );
        self.publish(event);
    }
}

/// Discards every event. For tools and tests that do not care about audit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}
