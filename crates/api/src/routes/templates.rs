use axum::routing::{get, put};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// ```text
/// GET    /        list (?user_id= for admins)
/// POST   /        create
/// PUT    /{id}    update
/// DELETE /{id}    delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route(
            "/{id}",
            put(templates::update_template).delete(templates::delete_template),
        )
}
