use bento_core::error::CoreError;
use bento_core::principal::ActingPrincipal;
use bento_db::models::report::{OrderReport, ReportFilter};
use bento_db::repositories::ReportRepo;

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Read-only settlement reporting over live orders.
#[derive(Clone)]
pub struct Reporting {
    ctx: EngineContext,
}

impl Reporting {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Line items and totals. Non-admins are limited to their own orders.
    pub async fn order_report(
        &self,
        principal: &ActingPrincipal,
        filter: &ReportFilter,
    ) -> EngineResult<OrderReport> {
        if filter.end_date < filter.start_date {
            return Err(CoreError::Validation(format!(
                "end_date {} is before start_date {}",
                filter.end_date, filter.start_date
            ))
            .into());
        }
        let mut filter = filter.clone();
        if !principal.is_admin {
            filter.user_id = principal.actor_id;
        }

        let lines = ReportRepo::line_items(&self.ctx.pool, &filter).await?;
        let totals = ReportRepo::totals(&self.ctx.pool, &filter).await?;
        Ok(OrderReport {
            start_date: filter.start_date,
            end_date: filter.end_date,
            lines,
            totals,
        })
    }
}
