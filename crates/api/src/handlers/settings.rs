use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use bento_db::models::settings::UpdateOrderSettings;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn get_settings(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<impl IntoResponse> {
    let settings = state.engine.settings.get().await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn update_settings(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<UpdateOrderSettings>,
) -> AppResult<impl IntoResponse> {
    body.validate()?;
    let settings = state
        .engine
        .settings
        .update(&admin.principal(), &body)
        .await?;
    Ok(Json(DataResponse { data: settings }))
}
