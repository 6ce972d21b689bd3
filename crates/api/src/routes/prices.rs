use axum::routing::{get, put};
use axum::Router;

use crate::handlers::prices;
use crate::state::AppState;

/// Price routes hang off two roots, so they are merged rather than nested.
///
/// ```text
/// GET  /menu-items/{id}/prices         history, newest first
/// POST /menu-items/{id}/prices         add a record (admin)
/// GET  /menu-items/{id}/price?date=    effective record
/// PUT  /prices/{id}                    edit a record (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/menu-items/{id}/prices",
            get(prices::list_prices).post(prices::create_price),
        )
        .route("/menu-items/{id}/price", get(prices::resolve_price))
        .route("/prices/{id}", put(prices::update_price))
}
