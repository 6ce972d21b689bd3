//! Repository for the `price_records` table.
//!
//! Overlap rules are decided in `bento_core::pricing`; this module only
//! reads and writes rows. Writers must hold the menu item lock
//! ([`MenuItemRepo::lock_for_update`](crate::repositories::MenuItemRepo::lock_for_update)).

use chrono::NaiveDate;
use sqlx::PgExecutor;
use bento_core::types::{DbId, Money};

use crate::models::price::PriceRecord;

const COLUMNS: &str = "id, menu_item_id, price, start_date, end_date, created_at, updated_at";

pub struct PriceRecordRepo;

impl PriceRecordRepo {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<PriceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM price_records WHERE id = $1");
        sqlx::query_as::<_, PriceRecord>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// All records of one item ordered by start date.
    pub async fn list_for_item<'e>(
        db: impl PgExecutor<'e>,
        menu_item_id: DbId,
    ) -> Result<Vec<PriceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_records
             WHERE menu_item_id = $1
             ORDER BY start_date"
        );
        sqlx::query_as::<_, PriceRecord>(&query)
            .bind(menu_item_id)
            .fetch_all(db)
            .await
    }

    /// The record whose interval contains `date`.
    pub async fn find_for_date<'e>(
        db: impl PgExecutor<'e>,
        menu_item_id: DbId,
        date: NaiveDate,
    ) -> Result<Option<PriceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM price_records
             WHERE menu_item_id = $1
               AND start_date <= $2
               AND (end_date IS NULL OR end_date >= $2)
             ORDER BY start_date DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, PriceRecord>(&query)
            .bind(menu_item_id)
            .bind(date)
            .fetch_optional(db)
            .await
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        menu_item_id: DbId,
        price: Money,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO price_records (menu_item_id, price, start_date, end_date)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceRecord>(&query)
            .bind(menu_item_id)
            .bind(price)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(db)
            .await
    }

    pub async fn update<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        price: Money,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceRecord, sqlx::Error> {
        let query = format!(
            "UPDATE price_records
             SET price = $2, start_date = $3, end_date = $4
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PriceRecord>(&query)
            .bind(id)
            .bind(price)
            .bind(start_date)
            .bind(end_date)
            .fetch_one(db)
            .await
    }

    /// Set the end date of an open record.
    pub async fn close<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        end_date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE price_records SET end_date = $2 WHERE id = $1 AND end_date IS NULL")
            .bind(id)
            .bind(end_date)
            .execute(db)
            .await?;
        Ok(())
    }
}
