//! Route definitions for `/orders`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// ```text
/// GET    /                 list (own orders unless admin)
/// POST   /                 place an order
/// GET    /{id}             fetch
/// PUT    /{id}             change item or quantity
/// DELETE /{id}             admin hard delete
/// POST   /{id}/cancel      cancel
/// POST   /{id}/reassign    admin owner change
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route(
            "/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::purge_order),
        )
        .route("/{id}/cancel", post(orders::cancel_order))
        .route("/{id}/reassign", post(orders::reassign_order))
}
