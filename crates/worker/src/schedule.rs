//! When the next daily run fires.
//!
//! Arithmetic is done on local wall-clock time and converted back to UTC, so
//! the run keeps its local hour across DST changes.

use std::time::Duration;

use chrono::{Days, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use bento_core::clock::local_to_utc;
use bento_core::types::Timestamp;

/// The first local instant at `run_at` strictly after `now_local`.
pub fn next_run_local(now_local: NaiveDateTime, run_at: NaiveTime) -> NaiveDateTime {
    let today = now_local.date().and_time(run_at);
    if today > now_local {
        today
    } else {
        now_local
            .date()
            .checked_add_days(Days::new(1))
            .map_or(today, |tomorrow| tomorrow.and_time(run_at))
    }
}

/// Wait used when a DST fold makes the next run resolve to the past.
const MIN_WAIT: Duration = Duration::from_secs(60);

/// How long to sleep from `now` until the next run.
pub fn duration_until_next_run(now: Timestamp, tz: Tz, run_at: NaiveTime) -> Duration {
    let now_local = now.with_timezone(&tz).naive_local();
    let next = local_to_utc(tz, next_run_local(now_local, run_at));
    (next - now)
        .to_std()
        .ok()
        .filter(|wait| !wait.is_zero())
        .unwrap_or(MIN_WAIT)
}
