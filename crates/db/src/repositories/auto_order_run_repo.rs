//! Repository for `auto_order_runs` and `auto_order_run_items`.

use chrono::NaiveDate;
use sqlx::PgPool;
use bento_core::auto_order::{RUN_STATUS_COMPLETED, RUN_STATUS_RUNNING};
use bento_core::types::DbId;

use crate::models::auto_order::{AutoOrderRun, AutoOrderRunItem, NewRunItem, RunCounts};
use crate::{clamp_limit, clamp_offset};

const RUN_COLUMNS: &str = "id, run_date, target_date, status, created_count, skipped_count, \
                           error_count, started_at, completed_at";
const ITEM_COLUMNS: &str = "id, run_id, user_id, result, detail, order_id, created_at";

pub struct AutoOrderRunRepo;

impl AutoOrderRunRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AutoOrderRun>, sqlx::Error> {
        let query = format!("SELECT {RUN_COLUMNS} FROM auto_order_runs WHERE id = $1");
        sqlx::query_as::<_, AutoOrderRun>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_run_date(
        pool: &PgPool,
        run_date: NaiveDate,
    ) -> Result<Option<AutoOrderRun>, sqlx::Error> {
        let query = format!("SELECT {RUN_COLUMNS} FROM auto_order_runs WHERE run_date = $1");
        sqlx::query_as::<_, AutoOrderRun>(&query)
            .bind(run_date)
            .fetch_optional(pool)
            .await
    }

    /// Claim `run_date`. Returns `None` when another run already holds it.
    pub async fn try_start(
        pool: &PgPool,
        run_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Result<Option<AutoOrderRun>, sqlx::Error> {
        let query = format!(
            "INSERT INTO auto_order_runs (run_date, target_date, status)
             VALUES ($1, $2, $3)
             ON CONFLICT (run_date) DO NOTHING
             RETURNING {RUN_COLUMNS}"
        );
        sqlx::query_as::<_, AutoOrderRun>(&query)
            .bind(run_date)
            .bind(target_date)
            .bind(RUN_STATUS_RUNNING)
            .fetch_optional(pool)
            .await
    }

    pub async fn add_item(pool: &PgPool, item: &NewRunItem) -> Result<AutoOrderRunItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO auto_order_run_items (run_id, user_id, result, detail, order_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, AutoOrderRunItem>(&query)
            .bind(item.run_id)
            .bind(item.user_id)
            .bind(item.result)
            .bind(&item.detail)
            .bind(item.order_id)
            .fetch_one(pool)
            .await
    }

    /// Mark a run completed with its final counts.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        counts: RunCounts,
    ) -> Result<AutoOrderRun, sqlx::Error> {
        let query = format!(
            "UPDATE auto_order_runs
             SET status = $2, created_count = $3, skipped_count = $4, error_count = $5,
                 completed_at = NOW()
             WHERE id = $1
             RETURNING {RUN_COLUMNS}"
        );
        sqlx::query_as::<_, AutoOrderRun>(&query)
            .bind(id)
            .bind(RUN_STATUS_COMPLETED)
            .bind(counts.created)
            .bind(counts.skipped)
            .bind(counts.error)
            .fetch_one(pool)
            .await
    }

    /// Drop an unfinished claim together with its items. Completed runs are
    /// never removed.
    pub async fn release(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auto_order_runs WHERE id = $1 AND status = $2")
            .bind(id)
            .bind(RUN_STATUS_RUNNING)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Most recent runs first.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<AutoOrderRun>, sqlx::Error> {
        let query = format!(
            "SELECT {RUN_COLUMNS} FROM auto_order_runs
             ORDER BY run_date DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, AutoOrderRun>(&query)
            .bind(clamp_limit(limit, 30, 365))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    pub async fn list_items(pool: &PgPool, run_id: DbId) -> Result<Vec<AutoOrderRunItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM auto_order_run_items WHERE run_id = $1 ORDER BY user_id, id"
        );
        sqlx::query_as::<_, AutoOrderRunItem>(&query)
            .bind(run_id)
            .fetch_all(pool)
            .await
    }
}
