//! Calendar day and weekday-default rows.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use bento_core::calendar::{DayRules, WeekdayDefault};
use bento_core::types::{DbId, Timestamp};
use validator::Validate;

// ---------------------------------------------------------------------------
// Calendar days
// ---------------------------------------------------------------------------

/// A row from the `calendar_days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarDay {
    pub calendar_date: NaiveDate,
    pub is_available: bool,
    pub deadline_time: Option<NaiveTime>,
    pub note: Option<String>,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CalendarDay {
    pub fn rules(&self) -> DayRules {
        DayRules {
            is_available: self.is_available,
            deadline_time: self.deadline_time,
        }
    }
}

/// Settings written to one calendar date.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertCalendarDay {
    pub is_available: bool,
    pub deadline_time: Option<NaiveTime>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

impl From<&WeekdayDefault> for UpsertCalendarDay {
    fn from(d: &WeekdayDefault) -> Self {
        Self {
            is_available: d.is_available,
            deadline_time: d.deadline_time,
            note: d.note.clone(),
        }
    }
}

/// Bulk edit: the same per-weekday settings applied to an explicit date list.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpsertCalendar {
    pub dates: Vec<NaiveDate>,
    pub settings_by_weekday: Vec<WeekdayDefault>,
}

/// Month-wide apply of the stored (or supplied) weekday defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyMonth {
    pub year: i32,
    pub month: u32,
    /// Overrides the stored weekday-default table when present.
    pub weekday_defaults: Option<Vec<WeekdayDefault>>,
}

/// Per-date outcome of a bulk calendar write.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarWriteFailure {
    pub date: NaiveDate,
    pub error: String,
}

/// Aggregate result of a bulk calendar write. Partial success is normal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalendarBulkResult {
    pub updated: Vec<CalendarDay>,
    pub skipped: Vec<NaiveDate>,
    pub failed: Vec<CalendarWriteFailure>,
}

// ---------------------------------------------------------------------------
// Weekday defaults
// ---------------------------------------------------------------------------

/// A row from the `calendar_weekday_defaults` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeekdayDefaultRow {
    pub weekday: i16,
    pub is_available: bool,
    pub deadline_time: Option<NaiveTime>,
    pub note: Option<String>,
    pub updated_at: Timestamp,
}

impl From<WeekdayDefaultRow> for WeekdayDefault {
    fn from(row: WeekdayDefaultRow) -> Self {
        Self {
            weekday: row.weekday,
            is_available: row.is_available,
            deadline_time: row.deadline_time,
            note: row.note,
        }
    }
}
