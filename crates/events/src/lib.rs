//! Audit event bus and persistence.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`AuditEvent`] -- one attributable state change.
//! - [`AuditSink`] -- the port ledgers record into after commit.
//! - [`AuditPersistence`] -- background task writing events to `audit_logs`.

pub mod bus;
pub mod persistence;
pub mod sink;

pub use bus::{AuditEvent, EventBus};
pub use persistence::AuditPersistence;
pub use sink::{AuditSink, NullAuditSink};
