//! Auto-order templates and batch-run rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::auto_order::{TemplateSlot, WeekdayScoped};
use bento_core::types::{DbId, Timestamp};
use validator::Validate;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// A row from the `auto_order_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutoOrderTemplate {
    pub id: DbId,
    pub user_id: DbId,
    pub menu_item_id: DbId,
    pub quantity: i32,
    /// `None` applies to every weekday.
    pub day_of_week: Option<i16>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AutoOrderTemplate {
    pub fn slot(&self) -> TemplateSlot {
        TemplateSlot {
            id: self.id,
            day_of_week: self.day_of_week,
        }
    }
}

impl WeekdayScoped for AutoOrderTemplate {
    fn day_of_week(&self) -> Option<i16> {
        self.day_of_week
    }
}

/// Request body for creating or replacing a template.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TemplateInput {
    /// Admins may manage another user's templates.
    pub user_id: Option<DbId>,
    pub menu_item_id: DbId,
    #[validate(range(min = 1, max = 99))]
    pub quantity: i32,
    #[validate(range(min = 0, max = 6))]
    pub day_of_week: Option<i16>,
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// A row from the `auto_order_runs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutoOrderRun {
    pub id: DbId,
    pub run_date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: String,
    pub created_count: i32,
    pub skipped_count: i32,
    pub error_count: i32,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// A row from the `auto_order_run_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AutoOrderRunItem {
    pub id: DbId,
    pub run_id: DbId,
    pub user_id: DbId,
    pub result: String,
    pub detail: Option<String>,
    pub order_id: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct NewRunItem {
    pub run_id: DbId,
    pub user_id: DbId,
    pub result: &'static str,
    pub detail: String,
    pub order_id: Option<DbId>,
}

/// Aggregate counters written when a run completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    pub created: i32,
    pub skipped: i32,
    pub error: i32,
}

/// A run together with its per-user items.
#[derive(Debug, Clone, Serialize)]
pub struct AutoOrderRunReport {
    #[serde(flatten)]
    pub run: AutoOrderRun,
    pub items: Vec<AutoOrderRunItem>,
}
