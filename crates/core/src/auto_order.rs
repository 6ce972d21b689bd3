//! Auto-order templates and batch-run vocabulary.
//!
//! A user's templates are either one wildcard ("every day", no weekday) or
//! up to seven weekday-specific templates with distinct weekdays. The batch
//! runner picks the template for the target date's weekday, preferring a
//! weekday-specific template if both kinds are somehow present.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{validate_weekday, weekday_index};
use crate::error::CoreError;
use crate::types::DbId;

/// How far ahead the runner looks for the next orderable date.
pub const SCAN_HORIZON_DAYS: u64 = 30;

pub const RUN_STATUS_RUNNING: &str = "running";
pub const RUN_STATUS_COMPLETED: &str = "completed";

/// Human-readable details recorded on run items.
pub mod details {
    pub const CREATED: &str = "order created";
    pub const ALREADY_ORDERED: &str = "already ordered for target date";
    pub const NO_TEMPLATE: &str = "no template matched";
    pub const CONCURRENT_ORDER: &str = "order placed concurrently";
    pub const MENU_ITEM_UNAVAILABLE: &str = "menu item inactive or missing";
}

/// Anything carrying an optional weekday, so matching works on both core
/// slots and database rows.
pub trait WeekdayScoped {
    fn day_of_week(&self) -> Option<i16>;
}

/// The part of a stored template relevant to conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSlot {
    pub id: DbId,
    pub day_of_week: Option<i16>,
}

impl WeekdayScoped for TemplateSlot {
    fn day_of_week(&self) -> Option<i16> {
        self.day_of_week
    }
}

/// Reject a template write that would mix wildcard and weekday templates or
/// repeat a weekday. `editing` is excluded from `existing`.
pub fn check_template_conflict(
    existing: &[TemplateSlot],
    editing: Option<DbId>,
    day_of_week: Option<i16>,
) -> Result<(), CoreError> {
    if let Some(day) = day_of_week {
        validate_weekday(day)?;
    }

    let others = existing.iter().filter(|t| Some(t.id) != editing);
    for other in others {
        match (other.day_of_week, day_of_week) {
            (None, None) => {
                return Err(CoreError::Conflict(
                    "An every-day template already exists".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(CoreError::Conflict(
                    "Remove the every-day template before adding weekday templates".into(),
                ));
            }
            (Some(_), None) => {
                return Err(CoreError::Conflict(
                    "Remove weekday templates before adding an every-day template".into(),
                ));
            }
            (Some(a), Some(b)) if a == b => {
                return Err(CoreError::Conflict(format!(
                    "A template for weekday {b} already exists"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Pick the template that applies on `date`.
pub fn select_template<T: WeekdayScoped>(templates: &[T], date: NaiveDate) -> Option<&T> {
    let weekday = weekday_index(date);
    templates
        .iter()
        .find(|t| t.day_of_week() == Some(weekday))
        .or_else(|| templates.iter().find(|t| t.day_of_week().is_none()))
}

/// First date in `(from, from + horizon]` for which `is_available` holds.
pub fn find_next_orderable(
    from: NaiveDate,
    horizon_days: u64,
    is_available: impl Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    (1..=horizon_days)
        .filter_map(|offset| from.checked_add_days(Days::new(offset)))
        .find(|date| is_available(*date))
}

/// Outcome of processing one user in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunItemResult {
    Created,
    Skipped,
    Error,
}

impl RunItemResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn slot(id: DbId, day: Option<i16>) -> TemplateSlot {
        TemplateSlot {
            id,
            day_of_week: day,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekday_template_after_wildcard_conflicts() {
        let existing = [slot(1, None)];
        assert_matches!(
            check_template_conflict(&existing, None, Some(2)),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn wildcard_after_weekday_template_conflicts() {
        let existing = [slot(1, Some(1))];
        assert!(check_template_conflict(&existing, None, None).is_err());
    }

    #[test]
    fn second_wildcard_conflicts() {
        assert!(check_template_conflict(&[slot(1, None)], None, None).is_err());
    }

    #[test]
    fn duplicate_weekday_conflicts_distinct_weekdays_do_not() {
        let existing = [slot(1, Some(1)), slot(2, Some(3))];
        assert!(check_template_conflict(&existing, None, Some(3)).is_err());
        assert!(check_template_conflict(&existing, None, Some(5)).is_ok());
    }

    #[test]
    fn editing_a_template_ignores_itself() {
        // Switching the only wildcard template to a weekday is allowed.
        assert!(check_template_conflict(&[slot(1, None)], Some(1), Some(4)).is_ok());
        // Moving weekday 1 onto weekday 3 still clashes with template 2.
        let existing = [slot(1, Some(1)), slot(2, Some(3))];
        assert!(check_template_conflict(&existing, Some(1), Some(3)).is_err());
    }

    #[test]
    fn out_of_range_weekday_is_a_validation_error() {
        assert_matches!(
            check_template_conflict(&[], None, Some(7)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn weekday_template_preferred_over_wildcard() {
        // 2025-06-10 is a Tuesday (2).
        let templates = [slot(1, None), slot(2, Some(2))];
        assert_eq!(select_template(&templates, date(2025, 6, 10)).map(|t| t.id), Some(2));
        assert_eq!(select_template(&templates, date(2025, 6, 11)).map(|t| t.id), Some(1));
    }

    #[test]
    fn no_matching_template() {
        let templates = [slot(1, Some(1))];
        assert!(select_template(&templates, date(2025, 6, 10)).is_none());
        assert!(select_template::<TemplateSlot>(&[], date(2025, 6, 10)).is_none());
    }

    #[test]
    fn next_orderable_skips_closed_days_and_today() {
        let open = [date(2025, 6, 10), date(2025, 6, 13)];
        let found = find_next_orderable(date(2025, 6, 10), SCAN_HORIZON_DAYS, |d| open.contains(&d));
        assert_eq!(found, Some(date(2025, 6, 13)));
    }

    #[test]
    fn next_orderable_respects_horizon() {
        let found = find_next_orderable(date(2025, 6, 10), 3, |d| d == date(2025, 6, 14));
        assert_eq!(found, None);
    }
}
