//! Repository for the single-row `order_settings` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::settings::{OrderSettings, UpdateOrderSettings};

const COLUMNS: &str = "max_days_ahead, closing_day, updated_at";

pub struct SettingsRepo;

impl SettingsRepo {
    pub async fn get<'e>(db: impl PgExecutor<'e>) -> Result<OrderSettings, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM order_settings WHERE id = 1");
        sqlx::query_as::<_, OrderSettings>(&query).fetch_one(db).await
    }

    pub async fn update(
        pool: &PgPool,
        input: &UpdateOrderSettings,
    ) -> Result<OrderSettings, sqlx::Error> {
        let query = format!(
            "UPDATE order_settings SET max_days_ahead = $1, closing_day = $2
             WHERE id = 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrderSettings>(&query)
            .bind(input.max_days_ahead)
            .bind(input.closing_day)
            .fetch_one(pool)
            .await
    }
}
