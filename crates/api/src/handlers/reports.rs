use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use bento_core::types::DbId;
use bento_db::models::report::ReportFilter;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Either a closing-period label or an explicit date range.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// `YYYY-MM` reference month of a closing period.
    pub period: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub vendor_id: Option<DbId>,
    pub user_id: Option<DbId>,
}

/// GET /api/v1/reports/orders
///
/// Non-admins always get their own orders only.
pub async fn order_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ReportQuery>,
) -> AppResult<impl IntoResponse> {
    let (start_date, end_date) = match (&params.period, params.start_date, params.end_date) {
        (Some(label), None, None) => {
            let period = state.engine.periods.for_label(label).await?;
            (period.start_date, period.end_date)
        }
        (None, Some(start), Some(end)) => (start, end),
        _ => {
            return Err(AppError::BadRequest(
                "Provide either period or both start_date and end_date".into(),
            ));
        }
    };

    let filter = ReportFilter {
        start_date,
        end_date,
        vendor_id: params.vendor_id,
        user_id: params.user_id,
    };
    let report = state
        .engine
        .reports
        .order_report(&auth.principal(), &filter)
        .await?;
    Ok(Json(DataResponse { data: report }))
}
