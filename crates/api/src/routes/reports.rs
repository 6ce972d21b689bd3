use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/orders", get(reports::order_report))
}
