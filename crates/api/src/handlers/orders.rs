//! Handlers for `/orders`.
//!
//! Non-admin callers act on their own orders only; the engine enforces
//! deadlines, the calendar, and the one-live-order-per-day rule.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bento_core::types::DbId;
use bento_db::models::order::{CreateOrder, OrderFilter, ReassignOrder, UpdateOrder};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/orders
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<OrderFilter>,
) -> AppResult<impl IntoResponse> {
    let orders = state.engine.orders.list(&auth.principal(), &filter).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// GET /api/v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = state.engine.orders.get(&auth.principal(), id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateOrder>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let order = state.engine.orders.create(&auth.principal(), &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// PUT /api/v1/orders/{id}
pub async fn update_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateOrder>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let order = state.engine.orders.update(&auth.principal(), id, &body).await?;
    Ok(Json(DataResponse { data: order }))
}

/// POST /api/v1/orders/{id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = state.engine.orders.cancel(&auth.principal(), id).await?;
    Ok(Json(DataResponse { data: order }))
}

/// DELETE /api/v1/orders/{id}
///
/// Hard delete for data corrections.
pub async fn purge_order(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.orders.admin_purge(&admin.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/orders/{id}/reassign
pub async fn reassign_order(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(body): Json<ReassignOrder>,
) -> AppResult<impl IntoResponse> {
    let order = state
        .engine
        .orders
        .admin_reassign(&admin.principal(), id, body.new_user_id)
        .await?;
    Ok(Json(DataResponse { data: order }))
}
