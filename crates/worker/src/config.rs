use anyhow::Context;
use chrono::NaiveTime;
use chrono_tz::Tz;
use bento_core::clock::{parse_timezone, DEFAULT_TIMEZONE};
use bento_engine::DEFAULT_RUN_CONCURRENCY;

/// Local time the batch fires when `AUTO_ORDER_RUN_AT` is unset.
pub const DEFAULT_RUN_AT: &str = "06:00";

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    pub business_timezone: Tz,
    /// Wall-clock time of the daily run in `business_timezone`.
    pub run_at: NaiveTime,
    pub concurrency: usize,
    /// Run the batch once and exit.
    pub run_once: bool,
}

impl WorkerConfig {
    /// | Env Var                  | Default      |
    /// |--------------------------|--------------|
    /// | `DATABASE_URL`           | required     |
    /// | `BUSINESS_TIMEZONE`      | `Asia/Tokyo` |
    /// | `AUTO_ORDER_RUN_AT`      | `06:00`      |
    /// | `AUTO_ORDER_CONCURRENCY` | `8`          |
    /// | `AUTO_ORDER_ONCE`        | unset        |
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let tz_name =
            std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into());
        let business_timezone = parse_timezone(&tz_name)?;

        let run_at_raw =
            std::env::var("AUTO_ORDER_RUN_AT").unwrap_or_else(|_| DEFAULT_RUN_AT.into());
        let run_at = parse_run_at(&run_at_raw)?;

        let concurrency: usize = std::env::var("AUTO_ORDER_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_RUN_CONCURRENCY.to_string())
            .parse()
            .context("AUTO_ORDER_CONCURRENCY must be a positive integer")?;
        anyhow::ensure!(concurrency > 0, "AUTO_ORDER_CONCURRENCY must be at least 1");

        let run_once = std::env::var("AUTO_ORDER_ONCE")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            business_timezone,
            run_at,
            concurrency,
            run_once,
        })
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn parse_run_at(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .with_context(|| format!("AUTO_ORDER_RUN_AT must be HH:MM, got '{value}'"))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
