//! Calendar store: per-date availability edited by admins.
//!
//! Bulk operations write date by date. Each date gets its own audit entry,
//! and a failing date is reported without aborting the rest.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::json;
use bento_core::audit::{actions, tables};
use bento_core::calendar::{
    default_for_date, month_dates, validate_weekday_defaults, WeekdayDefault,
};
use bento_core::error::CoreError;
use bento_core::principal::ActingPrincipal;
use bento_db::models::calendar::{
    CalendarBulkResult, CalendarDay, CalendarWriteFailure, UpsertCalendarDay, WeekdayDefaultRow,
};
use bento_db::repositories::{CalendarRepo, WeekdayDefaultRepo};

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Longest range a single listing may span.
const MAX_LIST_DAYS: i64 = 366;

#[derive(Clone)]
pub struct CalendarStore {
    ctx: EngineContext,
}

impl CalendarStore {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn get_day(&self, date: NaiveDate) -> EngineResult<Option<CalendarDay>> {
        Ok(CalendarRepo::find(&self.ctx.pool, date).await?)
    }

    pub async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> EngineResult<Vec<CalendarDay>> {
        if to < from {
            return Err(CoreError::Validation(format!("'to' ({to}) is before 'from' ({from})")).into());
        }
        if (to - from).num_days() >= MAX_LIST_DAYS {
            return Err(CoreError::Validation(format!(
                "Calendar range may span at most {MAX_LIST_DAYS} days"
            ))
            .into());
        }
        Ok(CalendarRepo::list_range(&self.ctx.pool, from, to).await?)
    }

    pub async fn upsert_day(
        &self,
        principal: &ActingPrincipal,
        date: NaiveDate,
        input: &UpsertCalendarDay,
    ) -> EngineResult<CalendarDay> {
        principal.require_admin()?;
        let day = CalendarRepo::upsert(&self.ctx.pool, date, input, principal.actor_id).await?;
        self.audit_day(principal, &day);
        tracing::info!(%date, is_available = day.is_available, "Calendar day updated");
        Ok(day)
    }

    /// Apply per-weekday settings to an explicit set of dates.
    ///
    /// Dates whose weekday has no entry in `settings_by_weekday` are skipped.
    pub async fn bulk_upsert(
        &self,
        principal: &ActingPrincipal,
        dates: &[NaiveDate],
        settings_by_weekday: &[WeekdayDefault],
    ) -> EngineResult<CalendarBulkResult> {
        principal.require_admin()?;
        validate_weekday_defaults(settings_by_weekday)?;

        let unique: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        Ok(self.write_dates(principal, unique, settings_by_weekday).await)
    }

    /// Apply a weekday-default table to every date of a month.
    ///
    /// Uses the stored table unless `defaults` is supplied.
    pub async fn apply_month(
        &self,
        principal: &ActingPrincipal,
        year: i32,
        month: u32,
        defaults: Option<&[WeekdayDefault]>,
    ) -> EngineResult<CalendarBulkResult> {
        principal.require_admin()?;
        let dates = month_dates(year, month)?;

        let stored: Vec<WeekdayDefault>;
        let defaults = match defaults {
            Some(d) => d,
            None => {
                stored = WeekdayDefaultRepo::list(&self.ctx.pool)
                    .await?
                    .into_iter()
                    .map(WeekdayDefault::from)
                    .collect();
                &stored
            }
        };
        validate_weekday_defaults(defaults)?;

        let result = self
            .write_dates(principal, dates.into_iter().collect(), defaults)
            .await;
        tracing::info!(
            year,
            month,
            updated = result.updated.len(),
            failed = result.failed.len(),
            "Weekday defaults applied to month"
        );
        Ok(result)
    }

    pub async fn weekday_defaults(&self) -> EngineResult<Vec<WeekdayDefaultRow>> {
        Ok(WeekdayDefaultRepo::list(&self.ctx.pool).await?)
    }

    pub async fn replace_weekday_defaults(
        &self,
        principal: &ActingPrincipal,
        defaults: &[WeekdayDefault],
    ) -> EngineResult<Vec<WeekdayDefaultRow>> {
        principal.require_admin()?;
        validate_weekday_defaults(defaults)?;
        let rows = WeekdayDefaultRepo::replace_all(&self.ctx.pool, defaults).await?;
        self.ctx.audit(
            principal,
            actions::CALENDAR_DEFAULTS_UPDATE,
            tables::CALENDAR_WEEKDAY_DEFAULTS,
            None,
            json!({ "defaults": defaults }),
        );
        Ok(rows)
    }

    async fn write_dates(
        &self,
        principal: &ActingPrincipal,
        dates: BTreeSet<NaiveDate>,
        defaults: &[WeekdayDefault],
    ) -> CalendarBulkResult {
        let mut result = CalendarBulkResult::default();
        for date in dates {
            let Some(setting) = default_for_date(defaults, date) else {
                result.skipped.push(date);
                continue;
            };
            let input = UpsertCalendarDay::from(setting);
            match CalendarRepo::upsert(&self.ctx.pool, date, &input, principal.actor_id).await {
                Ok(day) => {
                    self.audit_day(principal, &day);
                    result.updated.push(day);
                }
                Err(e) => {
                    tracing::warn!(%date, error = %e, "Calendar write failed");
                    result.failed.push(CalendarWriteFailure {
                        date,
                        error: e.to_string(),
                    });
                }
            }
        }
        result
    }

    fn audit_day(&self, principal: &ActingPrincipal, day: &CalendarDay) {
        self.ctx.audit(
            principal,
            actions::CALENDAR_UPSERT,
            tables::CALENDAR_DAYS,
            None,
            json!({
                "date": day.calendar_date,
                "is_available": day.is_available,
                "deadline_time": day.deadline_time,
                "note": day.note,
            }),
        );
    }
}
