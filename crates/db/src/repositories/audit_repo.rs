//! Repository for the append-only `audit_logs` table.

use sqlx::PgPool;
use bento_core::types::DbId;

use crate::models::audit::{AuditLog, CreateAuditLog};

const COLUMNS: &str = "id, actor_id, action, target_table, target_id, details, created_at";

pub struct AuditLogRepo;

impl AuditLogRepo {
    pub async fn insert(pool: &PgPool, input: &CreateAuditLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "INSERT INTO audit_logs (actor_id, action, target_table, target_id, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(input.actor_id)
        .bind(&input.action)
        .bind(&input.target_table)
        .bind(input.target_id)
        .bind(&input.details)
        .fetch_one(pool)
        .await
    }

    /// Entries for one target row, oldest first.
    pub async fn list_for_target(
        pool: &PgPool,
        target_table: &str,
        target_id: DbId,
    ) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM audit_logs
             WHERE target_table = $1 AND target_id = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(target_table)
            .bind(target_id)
            .fetch_all(pool)
            .await
    }

    /// Entries with a given action, oldest first.
    pub async fn list_by_action(pool: &PgPool, action: &str) -> Result<Vec<AuditLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM audit_logs WHERE action = $1 ORDER BY id");
        sqlx::query_as::<_, AuditLog>(&query)
            .bind(action)
            .fetch_all(pool)
            .await
    }
}
