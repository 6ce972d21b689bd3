use axum::routing::get;
use axum::Router;

use crate::handlers::auto_order;
use crate::state::AppState;

/// Admin-only.
///
/// ```text
/// GET  /        run history
/// POST /        run today's batch
/// GET  /{id}    run with per-user items
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(auto_order::list_runs).post(auto_order::trigger_run))
        .route("/{id}", get(auto_order::get_run))
}
