//! Order status/source vocabulary and field validation.
//!
//! Orders move `ordered → canceled` and never back. Only `ordered` rows
//! count toward the one-order-per-user-per-day rule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

pub const STATUS_ORDERED: &str = "ordered";
pub const STATUS_CANCELED: &str = "canceled";

pub const SOURCE_MANUAL: &str = "manual";
pub const SOURCE_AUTO: &str = "auto";

/// Unique index enforcing one live order per user and day.
pub const UQ_ORDERS_USER_DATE_ORDERED: &str = "uq_orders_user_date_ordered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Ordered,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => STATUS_ORDERED,
            Self::Canceled => STATUS_CANCELED,
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ORDERED => Ok(Self::Ordered),
            STATUS_CANCELED => Ok(Self::Canceled),
            other => Err(CoreError::Validation(format!(
                "Unknown order status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Manual,
    Auto,
}

impl OrderSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => SOURCE_MANUAL,
            Self::Auto => SOURCE_AUTO,
        }
    }
}

pub fn validate_quantity(quantity: i32) -> Result<(), CoreError> {
    if quantity < 1 {
        return Err(CoreError::Validation(format!(
            "quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

/// Canceled orders are frozen.
pub fn ensure_modifiable(order_id: DbId, status: &str) -> Result<(), CoreError> {
    match OrderStatus::parse(status)? {
        OrderStatus::Ordered => Ok(()),
        OrderStatus::Canceled => Err(CoreError::Conflict(format!(
            "Order {order_id} is canceled"
        ))),
    }
}

pub fn duplicate_order(user_id: DbId, date: NaiveDate) -> CoreError {
    CoreError::Conflict(format!(
        "DuplicateOrder: user {user_id} already has an order on {date}"
    ))
}

/// Parse a `YYYY-MM-DD` request value.
pub fn parse_date(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CoreError::Validation(format!("Invalid date format: {value}")))
}
