//! Repository for the `orders` table.
//!
//! The partial unique index `uq_orders_user_date_ordered` is the final
//! arbiter of one live order per user and day; callers translate its
//! violation into a domain conflict.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};
use bento_core::ordering::{STATUS_CANCELED, STATUS_ORDERED};
use bento_core::types::{DbId, Money};

use crate::models::order::{NewOrder, Order, OrderFilter};
use crate::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, user_id, menu_item_id, price_record_id, order_date, quantity, \
                       unit_price, status, source, created_at, updated_at";

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

pub struct OrderRepo;

impl OrderRepo {
    pub async fn find_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Lock an order row for the rest of the transaction.
    pub async fn lock_for_update<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// The live (`ordered`) order for a user on a date, if any.
    pub async fn find_ordered_for_day<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        order_date: NaiveDate,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE user_id = $1 AND order_date = $2 AND status = $3"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(user_id)
            .bind(order_date)
            .bind(STATUS_ORDERED)
            .fetch_optional(db)
            .await
    }

    /// Filtered listing, newest date first.
    pub async fn list(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
               AND ($2::DATE IS NULL OR order_date >= $2)
               AND ($3::DATE IS NULL OR order_date <= $3)
               AND ($4::TEXT IS NULL OR status = $4)
             ORDER BY order_date DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(filter.user_id)
            .bind(filter.from)
            .bind(filter.to)
            .bind(&filter.status)
            .bind(clamp_limit(filter.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT))
            .bind(clamp_offset(filter.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn insert<'e>(db: impl PgExecutor<'e>, input: &NewOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (user_id, menu_item_id, price_record_id, order_date, quantity, unit_price, status, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.user_id)
            .bind(input.menu_item_id)
            .bind(input.price_record_id)
            .bind(input.order_date)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(STATUS_ORDERED)
            .bind(input.source)
            .fetch_one(db)
            .await
    }

    /// Remove canceled rows that would collide with a new live order for
    /// the same user, date, and menu item.
    pub async fn delete_stale_canceled<'e>(
        db: impl PgExecutor<'e>,
        user_id: DbId,
        order_date: NaiveDate,
        menu_item_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM orders
             WHERE user_id = $1 AND order_date = $2 AND menu_item_id = $3 AND status = $4",
        )
        .bind(user_id)
        .bind(order_date)
        .bind(menu_item_id)
        .bind(STATUS_CANCELED)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Overwrite item, quantity, and the price snapshot.
    pub async fn update_item<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        menu_item_id: DbId,
        price_record_id: DbId,
        quantity: i32,
        unit_price: Money,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "UPDATE orders
             SET menu_item_id = $2, price_record_id = $3, quantity = $4, unit_price = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(menu_item_id)
            .bind(price_record_id)
            .bind(quantity)
            .bind(unit_price)
            .fetch_one(db)
            .await
    }

    /// Soft-cancel. Returns `None` if the order is missing or already canceled.
    pub async fn cancel<'e>(db: impl PgExecutor<'e>, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(STATUS_CANCELED)
            .bind(STATUS_ORDERED)
            .fetch_optional(db)
            .await
    }

    /// Hard delete. Returns `true` if a row was removed.
    pub async fn delete<'e>(db: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an order to another user.
    pub async fn reassign<'e>(
        db: impl PgExecutor<'e>,
        id: DbId,
        new_user_id: DbId,
    ) -> Result<Order, sqlx::Error> {
        let query = format!("UPDATE orders SET user_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(new_user_id)
            .fetch_one(db)
            .await
    }
}
