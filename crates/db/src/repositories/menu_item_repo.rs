//! Repository for the `vendors` and `menu_items` tables.

use sqlx::{PgExecutor, PgPool};
use bento_core::types::DbId;

use crate::models::menu::{CreateMenuItem, CreateVendor, MenuItem, Vendor};

const VENDOR_COLUMNS: &str = "id, name, is_active, created_at, updated_at";
const COLUMNS: &str = "id, vendor_id, name, is_active, created_at, updated_at";

/// Catalog access used by ordering and pricing.
pub struct MenuItemRepo;

impl MenuItemRepo {
    pub async fn create_vendor(pool: &PgPool, input: &CreateVendor) -> Result<Vendor, sqlx::Error> {
        let query = format!("INSERT INTO vendors (name) VALUES ($1) RETURNING {VENDOR_COLUMNS}");
        sqlx::query_as::<_, Vendor>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateMenuItem) -> Result<MenuItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO menu_items (vendor_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(input.vendor_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_items WHERE id = $1");
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Lock the menu item row so concurrent price writers queue up.
    pub async fn lock_for_update<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<MenuItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM menu_items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, MenuItem>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Flip `is_active`. Returns `true` if the row exists.
    pub async fn set_active(pool: &PgPool, id: DbId, is_active: bool) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE menu_items SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
