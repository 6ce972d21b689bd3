//! Handlers for `/calendar`.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use bento_core::calendar::WeekdayDefault;
use bento_core::ordering::parse_date;
use bento_db::models::calendar::{ApplyMonth, BulkUpsertCalendar, UpsertCalendarDay};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::DateRangeParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/calendar?from=&to=
pub async fn list_days(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(range): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let days = state.engine.calendar.list_range(range.from, range.to).await?;
    Ok(Json(DataResponse { data: days }))
}

/// GET /api/v1/calendar/{date}
///
/// `data` is `null` when the date has no row (treated as closed).
pub async fn get_day(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(date): Path<String>,
) -> AppResult<impl IntoResponse> {
    let date = parse_date(&date)?;
    let day = state.engine.calendar.get_day(date).await?;
    Ok(Json(DataResponse { data: day }))
}

/// PUT /api/v1/calendar/{date}
pub async fn upsert_day(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(date): Path<String>,
    Json(body): Json<UpsertCalendarDay>,
) -> AppResult<impl IntoResponse> {
    let date = parse_date(&date)?;
    body.validate()?;
    let day = state
        .engine
        .calendar
        .upsert_day(&admin.principal(), date, &body)
        .await?;
    Ok(Json(DataResponse { data: day }))
}

/// POST /api/v1/calendar/bulk
///
/// Per-date writes; failures are reported, not raised.
pub async fn bulk_upsert(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<BulkUpsertCalendar>,
) -> AppResult<impl IntoResponse> {
    let result = state
        .engine
        .calendar
        .bulk_upsert(&admin.principal(), &body.dates, &body.settings_by_weekday)
        .await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/calendar/apply-month
pub async fn apply_month(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<ApplyMonth>,
) -> AppResult<impl IntoResponse> {
    let result = state
        .engine
        .calendar
        .apply_month(
            &admin.principal(),
            body.year,
            body.month,
            body.weekday_defaults.as_deref(),
        )
        .await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/calendar/weekday-defaults
pub async fn get_weekday_defaults(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let defaults = state.engine.calendar.weekday_defaults().await?;
    Ok(Json(DataResponse { data: defaults }))
}

/// PUT /api/v1/calendar/weekday-defaults
pub async fn replace_weekday_defaults(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<Vec<WeekdayDefault>>,
) -> AppResult<impl IntoResponse> {
    let defaults = state
        .engine
        .calendar
        .replace_weekday_defaults(&admin.principal(), &body)
        .await?;
    Ok(Json(DataResponse { data: defaults }))
}
