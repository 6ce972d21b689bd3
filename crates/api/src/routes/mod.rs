pub mod auto_order;
pub mod calendar;
pub mod closing_periods;
pub mod health;
pub mod orders;
pub mod prices;
pub mod reports;
pub mod settings;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /orders                     list, create, get, update, cancel, purge, reassign
/// /calendar                   days, bulk edit, month apply, weekday defaults
/// /menu-items/{id}/prices     price history and create
/// /menu-items/{id}/price      effective price on a date
/// /prices/{id}                price edit
/// /auto-order/templates       per-user templates
/// /admin/auto-order/runs      batch trigger and history
/// /closing-periods            period enumeration
/// /reports                    order totals
/// /settings                   order settings
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/calendar", calendar::router())
        .merge(prices::router())
        .nest("/auto-order/templates", templates::router())
        .nest("/admin/auto-order/runs", auto_order::router())
        .nest("/closing-periods", closing_periods::router())
        .nest("/reports", reports::router())
        .nest("/settings", settings::router())
}
