//! Single-row ordering settings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::Timestamp;
use validator::Validate;

/// The row from the `order_settings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderSettings {
    pub max_days_ahead: i32,
    /// `None` closes billing periods at month end.
    pub closing_day: Option<i16>,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateOrderSettings {
    #[validate(range(min = 0, max = 365))]
    pub max_days_ahead: i32,
    #[validate(range(min = 1, max = 31))]
    pub closing_day: Option<i16>,
}
