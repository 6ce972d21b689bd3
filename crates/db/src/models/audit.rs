//! Audit log rows. Append-only, no `updated_at`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::{DbId, Timestamp};

/// A row from the `audit_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub actor_id: Option<DbId>,
    pub action: String,
    pub target_table: String,
    pub target_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuditLog {
    pub actor_id: Option<DbId>,
    pub action: String,
    pub target_table: String,
    pub target_id: Option<DbId>,
    pub details: serde_json::Value,
}
