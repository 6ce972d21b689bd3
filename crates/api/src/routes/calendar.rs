//! Route definitions for `/calendar`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// ```text
/// GET  /?from=&to=          days in range
/// POST /bulk                per-weekday settings over a date list (admin)
/// POST /apply-month         weekday defaults over a month (admin)
/// GET  /weekday-defaults    stored weekday table
/// PUT  /weekday-defaults    replace weekday table (admin)
/// GET  /{date}              one day
/// PUT  /{date}              upsert one day (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar::list_days))
        .route("/bulk", post(calendar::bulk_upsert))
        .route("/apply-month", post(calendar::apply_month))
        .route(
            "/weekday-defaults",
            get(calendar::get_weekday_defaults).put(calendar::replace_weekday_defaults),
        )
        .route("/{date}", get(calendar::get_day).put(calendar::upsert_day))
}
