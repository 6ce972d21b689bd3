//! Handlers for `/auto-order/templates`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use bento_core::types::DbId;
use bento_db::models::auto_order::TemplateInput;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TemplateListQuery {
    /// Admins may list another user's templates.
    pub user_id: Option<DbId>,
}

/// GET /api/v1/auto-order/templates
pub async fn list_templates(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<TemplateListQuery>,
) -> AppResult<impl IntoResponse> {
    let templates = state
        .engine
        .templates
        .list(&auth.principal(), params.user_id)
        .await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/auto-order/templates
pub async fn create_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let template = state.engine.templates.create(&auth.principal(), &body).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// PUT /api/v1/auto-order/templates/{id}
pub async fn update_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(body): Json<TemplateInput>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let template = state
        .engine
        .templates
        .update(&auth.principal(), id, &body)
        .await?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/auto-order/templates/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.templates.delete(&auth.principal(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
