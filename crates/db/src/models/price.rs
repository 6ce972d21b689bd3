//! Price record rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::pricing::PriceSpan;
use bento_core::types::{DbId, Money, Timestamp};
use validator::Validate;

/// A row from the `price_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PriceRecord {
    pub id: DbId,
    pub menu_item_id: DbId,
    pub price: Money,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PriceRecord {
    pub fn span(&self) -> PriceSpan {
        PriceSpan {
            id: self.id,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// DTO for creating or replacing a price record's fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PriceRecordInput {
    #[validate(range(min = 0))]
    pub price: Money,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}
