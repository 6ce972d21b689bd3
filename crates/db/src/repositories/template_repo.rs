//! Repository for the `auto_order_templates` table.

use sqlx::{PgExecutor, PgPool};
use bento_core::types::DbId;

use crate::models::auto_order::AutoOrderTemplate;

const COLUMNS: &str = "id, user_id, menu_item_id, quantity, day_of_week, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<AutoOrderTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM auto_order_templates WHERE id = $1");
        sqlx::query_as::<_, AutoOrderTemplate>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// A user's templates, wildcard first then by weekday.
    pub async fn list_for_user<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
    ) -> Result<Vec<AutoOrderTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auto_order_templates
             WHERE user_id = $1
             ORDER BY day_of_week NULLS FIRST, id"
        );
        sqlx::query_as::<_, AutoOrderTemplate>(&query)
            .bind(user_id)
            .fetch_all(db)
            .await
    }

    /// Templates of many users in one round trip.
    pub async fn list_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
    ) -> Result<Vec<AutoOrderTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM auto_order_templates
             WHERE user_id = ANY($1)
             ORDER BY user_id, day_of_week NULLS FIRST, id"
        );
        sqlx::query_as::<_, AutoOrderTemplate>(&query)
            .bind(user_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        menu_item_id: DbId,
        quantity: i32,
        day_of_week: Option<i16>,
    ) -> Result<AutoOrderTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO auto_order_templates (user_id, menu_item_id, quantity, day_of_week)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutoOrderTemplate>(&query)
            .bind(user_id)
            .bind(menu_item_id)
            .bind(quantity)
            .bind(day_of_week)
            .fetch_one(db)
            .await
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        menu_item_id: DbId,
        quantity: i32,
        day_of_week: Option<i16>,
    ) -> Result<AutoOrderTemplate, sqlx::Error> {
        let query = format!(
            "UPDATE auto_order_templates
             SET menu_item_id = $2, quantity = $3, day_of_week = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AutoOrderTemplate>(&query)
            .bind(id)
            .bind(menu_item_id)
            .bind(quantity)
            .bind(day_of_week)
            .fetch_one(db)
            .await
    }

    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM auto_order_templates WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
