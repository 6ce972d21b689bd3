//! Order rows and request DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::{DbId, Money, Timestamp};
use validator::Validate;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub user_id: DbId,
    pub menu_item_id: DbId,
    pub price_record_id: DbId,
    pub order_date: NaiveDate,
    pub quantity: i32,
    /// Price captured when the order was placed or last edited.
    pub unit_price: Money,
    pub status: String,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully resolved values for an insert.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: DbId,
    pub menu_item_id: DbId,
    pub price_record_id: DbId,
    pub order_date: NaiveDate,
    pub quantity: i32,
    pub unit_price: Money,
    pub source: &'static str,
}

/// Request body for placing an order. `user_id` defaults to the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    pub user_id: Option<DbId>,
    pub menu_item_id: DbId,
    pub order_date: NaiveDate,
    #[validate(range(min = 1, max = 99))]
    pub quantity: i32,
}

/// Request body for changing an order's item or quantity.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrder {
    pub menu_item_id: DbId,
    #[validate(range(min = 1, max = 99))]
    pub quantity: i32,
}

/// Request body for moving an order to another user.
#[derive(Debug, Clone, Deserialize)]
pub struct ReassignOrder {
    pub new_user_id: DbId,
}

/// Filters for order listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub user_id: Option<DbId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
