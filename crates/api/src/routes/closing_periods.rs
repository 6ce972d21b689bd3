use axum::routing::get;
use axum::Router;

use crate::handlers::closing_periods;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(closing_periods::list_periods))
        .route("/current", get(closing_periods::current_period))
}
