//! Orderable-day calendar and deadline rules.
//!
//! A [`DayRules`] describes one calendar date. An [`OrderWindow`] captures
//! "now" in the business time zone plus the configured horizon, and decides
//! whether an order for a given date may be created, edited, or cancelled.
//! Admin principals bypass every temporal rule.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::principal::ActingPrincipal;

/// Default number of days ahead a non-admin may order.
pub const DEFAULT_MAX_DAYS_AHEAD: i32 = 30;

/// The ordering-relevant part of a calendar row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayRules {
    pub is_available: bool,
    pub deadline_time: Option<NaiveTime>,
}

impl DayRules {
    /// Deadline that actually applies. A closed day has none.
    pub fn effective_deadline(&self) -> Option<NaiveTime> {
        if self.is_available {
            self.deadline_time
        } else {
            None
        }
    }
}

/// "Now" as seen by the ordering rules.
#[derive(Debug, Clone, Copy)]
pub struct OrderWindow {
    pub today: NaiveDate,
    pub now_time: NaiveTime,
    pub max_days_ahead: i32,
}

impl OrderWindow {
    pub fn new(now_local: NaiveDateTime, max_days_ahead: i32) -> Self {
        Self {
            today: now_local.date(),
            now_time: now_local.time(),
            max_days_ahead,
        }
    }

    /// Last date a non-admin may order for.
    pub fn horizon(&self) -> NaiveDate {
        self.today
            .checked_add_days(Days::new(self.max_days_ahead.max(0) as u64))
            .unwrap_or(NaiveDate::MAX)
    }

    /// True when `date` is today and its deadline has been reached.
    pub fn is_past_deadline(&self, date: NaiveDate, day: Option<&DayRules>) -> bool {
        match day.and_then(DayRules::effective_deadline) {
            Some(deadline) => date == self.today && self.now_time >= deadline,
            None => false,
        }
    }

    /// Rules for creating or editing an order on `date`.
    ///
    /// A missing calendar row counts as a closed day.
    pub fn check_orderable(
        &self,
        principal: &ActingPrincipal,
        date: NaiveDate,
        day: Option<&DayRules>,
    ) -> Result<(), CoreError> {
        if principal.is_admin {
            return Ok(());
        }
        if date < self.today {
            return Err(CoreError::NotAvailable(format!(
                "{date} is in the past (today is {})",
                self.today
            )));
        }
        match day {
            Some(rules) if rules.is_available => {}
            _ => {
                return Err(CoreError::NotAvailable(format!(
                    "{date} is not an orderable day"
                )));
            }
        }
        if self.is_past_deadline(date, day) {
            return Err(CoreError::NotAvailable(format!(
                "The ordering deadline for {date} has passed"
            )));
        }
        if date > self.horizon() {
            return Err(CoreError::NotAvailable(format!(
                "{date} is more than {} days ahead",
                self.max_days_ahead
            )));
        }
        Ok(())
    }

    /// Rules for cancelling an order on `date`: past dates and passed
    /// same-day deadlines are locked for non-admins.
    pub fn check_cancellable(
        &self,
        principal: &ActingPrincipal,
        date: NaiveDate,
        day: Option<&DayRules>,
    ) -> Result<(), CoreError> {
        if principal.is_admin {
            return Ok(());
        }
        if date < self.today {
            return Err(CoreError::NotAvailable(format!(
                "Orders for past date {date} can no longer be cancelled"
            )));
        }
        if self.is_past_deadline(date, day) {
            return Err(CoreError::NotAvailable(format!(
                "The cancellation deadline for {date} has passed"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Weekday index with Sunday = 0 … Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

pub fn validate_weekday(weekday: i16) -> Result<(), CoreError> {
    if (0..=6).contains(&weekday) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "day_of_week must be between 0 (Sunday) and 6 (Saturday), got {weekday}"
        )))
    }
}

/// One entry of the admin-maintained weekday default table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayDefault {
    pub weekday: i16,
    pub is_available: bool,
    pub deadline_time: Option<NaiveTime>,
    pub note: Option<String>,
}

/// Reject tables with out-of-range or repeated weekdays.
pub fn validate_weekday_defaults(defaults: &[WeekdayDefault]) -> Result<(), CoreError> {
    let mut seen = [false; 7];
    for d in defaults {
        validate_weekday(d.weekday)?;
        let slot = &mut seen[d.weekday as usize];
        if *slot {
            return Err(CoreError::Validation(format!(
                "Weekday {} appears more than once",
                d.weekday
            )));
        }
        *slot = true;
    }
    Ok(())
}

/// Find the default settings that apply to `date`.
pub fn default_for_date(defaults: &[WeekdayDefault], date: NaiveDate) -> Option<&WeekdayDefault> {
    let weekday = weekday_index(date);
    defaults.iter().find(|d| d.weekday == weekday)
}

/// Every date of the given month, in order.
pub fn month_dates(year: i32, month: u32) -> Result<Vec<NaiveDate>, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CoreError::Validation(format!("Invalid month {year}-{month:02}")))?;
    let mut dates = Vec::with_capacity(31);
    let mut cursor = first;
    while cursor.month() == month {
        dates.push(cursor);
        match cursor.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }
    Ok(dates)
}
