//! Injected time source and business time-zone conversion.
//!
//! No rule in this workspace calls `Utc::now()` directly. Components hold a
//! [`BusinessClock`], which pairs a [`Clock`] with the organization's time
//! zone so "today" is always the local calendar day, never UTC midnight.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default business time zone when `BUSINESS_TIMEZONE` is unset.
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the host clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A settable clock for tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Build a clock pinned to a wall-clock time in `tz`.
    pub fn at_local(tz: Tz, date: NaiveDate, time: NaiveTime) -> Self {
        Self::new(local_to_utc(tz, date.and_time(time)))
    }

    pub fn set(&self, now: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn set_local(&self, tz: Tz, date: NaiveDate, time: NaiveTime) {
        self.set(local_to_utc(tz, date.and_time(time)));
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A clock bound to the organization's time zone.
#[derive(Clone)]
pub struct BusinessClock {
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl std::fmt::Debug for BusinessClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessClock")
            .field("tz", &self.tz)
            .field("now", &self.clock.now())
            .finish()
    }
}

impl BusinessClock {
    pub fn new(clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { clock, tz }
    }

    pub fn system(tz: Tz) -> Self {
        Self::new(Arc::new(SystemClock), tz)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Current wall-clock time in the business time zone.
    pub fn now_local(&self) -> NaiveDateTime {
        self.clock.now().with_timezone(&self.tz).naive_local()
    }

    /// Current calendar day in the business time zone.
    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

/// Parse an IANA time zone name such as `Asia/Tokyo`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::Validation(format!("Unknown time zone: {name}")))
}

/// Local wall-clock time → UTC instant.
///
/// DST gap fallback: when the local time does not exist, interpret it as UTC.
pub fn local_to_utc(tz: Tz, local: NaiveDateTime) -> Timestamp {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| local.and_utc())
}
