//! Read-only settlement report shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::types::{DbId, Money};

/// One `ordered` order joined with its user, vendor, and menu item.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReportLine {
    pub order_id: DbId,
    pub order_date: NaiveDate,
    pub user_id: DbId,
    pub user_name: String,
    pub vendor_id: DbId,
    pub vendor_name: String,
    pub menu_item_id: DbId,
    pub menu_item_name: String,
    pub quantity: i32,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Sums over the same filter as the line items.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct ReportTotals {
    pub order_count: i64,
    pub total_quantity: i64,
    pub total_amount: Money,
}

/// Inclusive date range plus optional vendor / user narrowing.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportFilter {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub vendor_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lines: Vec<ReportLine>,
    pub totals: ReportTotals,
}
