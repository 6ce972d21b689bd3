//! Shared query parameter types for API handlers.

use chrono::NaiveDate;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Inclusive date range (`?from=&to=`).
#[derive(Debug, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}
