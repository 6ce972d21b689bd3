//! Time-ranged price intervals for menu items.
//!
//! For one menu item, the intervals `[start_date, end_date]` (an absent end
//! date means open-ended) never overlap and at most one is open. New records
//! auto-close an older open record; anything else that would overlap is
//! rejected. Inserts and edits share the same rule: an edit is planned
//! against every record except the one being edited.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::{DbId, Money};

/// The date range of one stored price record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSpan {
    pub id: DbId,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl PriceSpan {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }

    pub fn is_open(&self) -> bool {
        self.end_date.is_none()
    }
}

/// True when two inclusive ranges share at least one day.
pub fn ranges_overlap(
    a_start: NaiveDate,
    a_end: Option<NaiveDate>,
    b_start: NaiveDate,
    b_end: Option<NaiveDate>,
) -> bool {
    let a_before_b = a_end.is_some_and(|end| end < b_start);
    let b_before_a = b_end.is_some_and(|end| end < a_start);
    !(a_before_b || b_before_a)
}

/// Side effect a price write must commit together with its own row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PriceWritePlan {
    /// Open record to close, and the end date to give it.
    pub close_open: Option<(DbId, NaiveDate)>,
}

pub fn validate_price_fields(
    price: Money,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::Validation(format!(
            "price must not be negative, got {price}"
        )));
    }
    if let Some(end) = end_date {
        if end < start_date {
            return Err(CoreError::Validation(format!(
                "end_date {end} is before start_date {start_date}"
            )));
        }
    }
    Ok(())
}

/// Decide how a write of `[start_date, end_date]` fits into `existing`.
///
/// `editing` excludes that record's current interval from consideration.
/// An open record starting strictly before `start_date` is closed the day
/// before; one starting on the same day would be left empty and counts as
/// an overlap instead.
pub fn plan_price_write(
    existing: &[PriceSpan],
    editing: Option<DbId>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<PriceWritePlan, CoreError> {
    let others: Vec<&PriceSpan> = existing
        .iter()
        .filter(|span| Some(span.id) != editing)
        .collect();

    let close_open = others
        .iter()
        .find(|span| span.is_open() && span.start_date < start_date)
        .and_then(|span| start_date.pred_opt().map(|end| (span.id, end)));

    for span in &others {
        if close_open.is_some_and(|(id, _)| id == span.id) {
            continue;
        }
        if ranges_overlap(span.start_date, span.end_date, start_date, end_date) {
            return Err(overlapping_price_range(span, start_date, end_date));
        }
    }

    Ok(PriceWritePlan { close_open })
}

/// Pick the record whose interval contains `date`.
pub fn resolve_span(spans: &[PriceSpan], date: NaiveDate) -> Option<&PriceSpan> {
    spans.iter().find(|span| span.contains(date))
}

pub fn overlapping_price_range(
    existing: &PriceSpan,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> CoreError {
    CoreError::Conflict(format!(
        "OverlappingPriceRange: {} – {} overlaps price record {} ({} – {})",
        start_date,
        fmt_end(end_date),
        existing.id,
        existing.start_date,
        fmt_end(existing.end_date),
    ))
}

pub fn price_not_found(menu_item_id: DbId, date: NaiveDate) -> CoreError {
    CoreError::NotAvailable(format!(
        "PriceNotFound: menu item {menu_item_id} has no price on {date}"
    ))
}

fn fmt_end(end: Option<NaiveDate>) -> String {
    end.map(|d| d.to_string()).unwrap_or_else(|| "open".into())
}
