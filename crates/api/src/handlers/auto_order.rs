//! Admin handlers for auto-order runs.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bento_core::types::DbId;
use bento_engine::RunOutcome;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/auto-order/runs
///
/// Runs today's batch. A second trigger on the same day returns the
/// existing run with 200 instead of 201.
pub async fn trigger_run(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let outcome = state.engine.runner.run(&admin.principal()).await?;
    let status = match &outcome {
        RunOutcome::Completed(_) => StatusCode::CREATED,
        RunOutcome::AlreadyRan(_) => StatusCode::OK,
    };
    Ok((status, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/admin/auto-order/runs
pub async fn list_runs(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let runs = state
        .engine
        .runner
        .list_runs(&admin.principal(), params.limit, params.offset)
        .await?;
    Ok(Json(DataResponse { data: runs }))
}

/// GET /api/v1/admin/auto-order/runs/{id}
pub async fn get_run(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = state.engine.runner.get_run(&admin.principal(), id).await?;
    Ok(Json(DataResponse { data: report }))
}
