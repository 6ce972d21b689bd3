use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_MONTHS_BACK: u32 = 12;

#[derive(Debug, Deserialize)]
pub struct PeriodsQuery {
    pub months_back: Option<u32>,
}

/// GET /api/v1/closing-periods?months_back=
///
/// Newest first: next period, current period, then history.
pub async fn list_periods(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<PeriodsQuery>,
) -> AppResult<impl IntoResponse> {
    let periods = state
        .engine
        .periods
        .enumerate(params.months_back.unwrap_or(DEFAULT_MONTHS_BACK))
        .await?;
    Ok(Json(DataResponse { data: periods }))
}

/// GET /api/v1/closing-periods/current
pub async fn current_period(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let period = state.engine.periods.current().await?;
    Ok(Json(DataResponse { data: period }))
}
