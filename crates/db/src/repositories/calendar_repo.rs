//! Repository for the `calendar_days` table.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use bento_core::types::DbId;

use crate::models::calendar::{CalendarDay, UpsertCalendarDay};

const COLUMNS: &str = "calendar_date, is_available, deadline_time, note, updated_by, \
                       created_at, updated_at";

/// Per-date availability. Rows are upserted, never deleted.
pub struct CalendarRepo;

impl CalendarRepo {
    pub async fn find<'e>(
        db: impl PgExecutor<'e>,
        date: NaiveDate,
    ) -> Result<Option<CalendarDay>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_days WHERE calendar_date = $1");
        sqlx::query_as::<_, CalendarDay>(&query)
            .bind(date)
            .fetch_optional(db)
            .await
    }

    /// Days in `[from, to]`, ascending.
    pub async fn list_range(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_days
             WHERE calendar_date BETWEEN $1 AND $2
             ORDER BY calendar_date"
        );
        sqlx::query_as::<_, CalendarDay>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Available dates in `[from, to]`, ascending.
    pub async fn list_available_dates(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, NaiveDate>(
            "SELECT calendar_date FROM calendar_days
             WHERE calendar_date BETWEEN $1 AND $2 AND is_available = true
             ORDER BY calendar_date",
        )
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Insert or overwrite one date.
    pub async fn upsert<'e>(
        db: impl PgExecutor<'e>,
        date: NaiveDate,
        input: &UpsertCalendarDay,
        updated_by: Option<DbId>,
    ) -> Result<CalendarDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_days (calendar_date, is_available, deadline_time, note, updated_by)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (calendar_date) DO UPDATE SET
                is_available = EXCLUDED.is_available,
                deadline_time = EXCLUDED.deadline_time,
                note = EXCLUDED.note,
                updated_by = EXCLUDED.updated_by
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarDay>(&query)
            .bind(date)
            .bind(input.is_available)
            .bind(input.deadline_time)
            .bind(&input.note)
            .bind(updated_by)
            .fetch_one(db)
            .await
    }
}
