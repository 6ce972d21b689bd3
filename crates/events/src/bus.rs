//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`AuditEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use bento_core::types::DbId;

// ---------------------------------------------------------------------------
// AuditEvent
// ---------------------------------------------------------------------------

/// One attributable state change. The row timestamp is taken by the
/// database when the event is persisted.
///
/// Constructed via [`AuditEvent::new`] and enriched with the builder
/// methods [`with_target`](AuditEvent::with_target),
/// [`with_actor`](AuditEvent::with_actor), and
/// [`with_details`](AuditEvent::with_details).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Dot-separated action name, e.g. `"order.cancel"`.
    pub action: String,

    /// Table of the changed row.
    pub target_table: String,

    /// Primary key of the changed row, when it has a numeric one.
    pub target_id: Option<DbId>,

    /// Acting user; `None` for the scheduler.
    pub actor_id: Option<DbId>,

    /// Free-form JSON carrying action-specific data.
    pub details: serde_json::Value,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, target_table: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            target_table: target_table.into(),
            target_id: None,
            actor_id: None,
            details: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_target(mut self, target_id: DbId) -> Self {
        self.target_id = Some(target_id);
        self
    }

    pub fn with_actor(mut self, actor_id: Option<DbId>) -> Self {
        self.actor_id = actor_id;
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`AuditEvent`].
pub struct EventBus {
    sender: broadcast::Sender<AuditEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: AuditEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
