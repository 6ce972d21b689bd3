//! Handlers for menu item price records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use bento_core::ordering::parse_date;
use bento_core::types::DbId;
use bento_db::models::price::PriceRecordInput;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PriceOnQuery {
    pub date: String,
}

/// GET /api/v1/menu-items/{id}/prices
pub async fn list_prices(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(menu_item_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let records = state.engine.prices.list(menu_item_id).await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/menu-items/{id}/price?date=YYYY-MM-DD
pub async fn resolve_price(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(menu_item_id): Path<DbId>,
    Query(params): Query<PriceOnQuery>,
) -> AppResult<impl IntoResponse> {
    let date = parse_date(&params.date)?;
    let record = state.engine.prices.resolve_price(menu_item_id, date).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/menu-items/{id}/prices
///
/// An older open record is closed the day before the new start date.
pub async fn create_price(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(menu_item_id): Path<DbId>,
    Json(body): Json<PriceRecordInput>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let record = state
        .engine
        .prices
        .create(&admin.principal(), menu_item_id, &body)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PUT /api/v1/prices/{id}
pub async fn update_price(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(body): Json<PriceRecordInput>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let record = state
        .engine
        .prices
        .update(&admin.principal(), id, &body)
        .await?;
    Ok(Json(DataResponse { data: record }))
}
