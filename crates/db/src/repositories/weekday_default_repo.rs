//! Repository for the `calendar_weekday_defaults` table.

use sqlx::PgPool;
use bento_core::calendar::WeekdayDefault;

use crate::models::calendar::WeekdayDefaultRow;

const COLUMNS: &str = "weekday, is_available, deadline_time, note, updated_at";

pub struct WeekdayDefaultRepo;

impl WeekdayDefaultRepo {
    /// The whole table, Sunday first.
    pub async fn list(pool: &PgPool) -> Result<Vec<WeekdayDefaultRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_weekday_defaults ORDER BY weekday");
        sqlx::query_as::<_, WeekdayDefaultRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Replace the table atomically with `defaults`.
    pub async fn replace_all(
        pool: &PgPool,
        defaults: &[WeekdayDefault],
    ) -> Result<Vec<WeekdayDefaultRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM calendar_weekday_defaults")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO calendar_weekday_defaults (weekday, is_available, deadline_time, note)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let mut rows = Vec::with_capacity(defaults.len());
        for d in defaults {
            let row = sqlx::query_as::<_, WeekdayDefaultRow>(&query)
                .bind(d.weekday)
                .bind(d.is_available)
                .bind(d.deadline_time)
                .bind(&d.note)
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        rows.sort_by_key(|r| r.weekday);
        Ok(rows)
    }
}
