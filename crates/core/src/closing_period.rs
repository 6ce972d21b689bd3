//! Billing closing-period arithmetic.
//!
//! A closing day `d` defines periods `(d of previous month, d of this month]`.
//! When `d` does not exist in a month (31 in April, 29+ in February) the
//! month's last day is used instead. No closing day means calendar months.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A calendar month used as a period's reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(CoreError::Validation(format!(
                "Invalid month {year}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("Expected YYYY-MM, got '{s}'"));
        let (y, m) = s.split_once('-').ok_or_else(invalid)?;
        let year = y.parse::<i32>().map_err(|_| invalid())?;
        let month = m.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// Day `day` of this month, or the last day when the month is shorter.
    pub fn clamped_day(self, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or_else(|| self.last_day())
    }

    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// One settlement window, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Reference month, `YYYY-MM`.
    pub label: String,
}

impl ClosingPeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Closing day must be `1..=31` when set.
pub fn validate_closing_day(closing_day: Option<i16>) -> Result<Option<u32>, CoreError> {
    match closing_day {
        None => Ok(None),
        Some(d) if (1..=31).contains(&d) => Ok(Some(d as u32)),
        Some(d) => Err(CoreError::Validation(format!(
            "closing_day must be between 1 and 31, got {d}"
        ))),
    }
}

/// The period whose reference month is `reference`.
pub fn compute_period(reference: YearMonth, closing_day: Option<u32>) -> ClosingPeriod {
    let (start_date, end_date) = match closing_day {
        None => (reference.first_day(), reference.last_day()),
        Some(day) => {
            let prev_close = reference.prev().clamped_day(day);
            let start = prev_close.succ_opt().unwrap_or(prev_close);
            (start, reference.clamped_day(day))
        }
    };
    ClosingPeriod {
        start_date,
        end_date,
        label: reference.label(),
    }
}

/// Reference month of the period that contains `date`.
pub fn reference_month_for(date: NaiveDate, closing_day: Option<u32>) -> YearMonth {
    let month = YearMonth::of(date);
    match closing_day {
        Some(day) if date > month.clamped_day(day) => month.next(),
        _ => month,
    }
}

/// Periods newest-first: one ahead of the current period, the current
/// period, then `months_back` earlier periods.
pub fn enumerate_periods(
    closing_day: Option<u32>,
    months_back: u32,
    today: NaiveDate,
) -> Vec<ClosingPeriod> {
    let current = reference_month_for(today, closing_day);
    let mut reference = current.next();
    let mut periods = Vec::with_capacity(months_back as usize + 2);
    for _ in 0..months_back + 2 {
        periods.push(compute_period(reference, closing_day));
        reference = reference.prev();
    }
    periods
}
