//! Billing closing periods bound to the stored closing day and the
//! business calendar's "today".

use bento_core::closing_period::{
    compute_period, enumerate_periods, reference_month_for, validate_closing_day, ClosingPeriod,
    YearMonth,
};
use bento_db::repositories::SettingsRepo;

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Upper bound for `months_back` in listings.
pub const MAX_MONTHS_BACK: u32 = 36;

#[derive(Clone)]
pub struct ClosingPeriods {
    ctx: EngineContext,
}

impl ClosingPeriods {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    async fn closing_day(&self) -> EngineResult<Option<u32>> {
        let settings = SettingsRepo::get(&self.ctx.pool).await?;
        Ok(validate_closing_day(settings.closing_day)?)
    }

    /// Next, current, and `months_back` earlier periods, newest first.
    pub async fn enumerate(&self, months_back: u32) -> EngineResult<Vec<ClosingPeriod>> {
        let closing_day = self.closing_day().await?;
        Ok(enumerate_periods(
            closing_day,
            months_back.min(MAX_MONTHS_BACK),
            self.ctx.clock.today(),
        ))
    }

    /// The period containing today.
    pub async fn current(&self) -> EngineResult<ClosingPeriod> {
        let closing_day = self.closing_day().await?;
        let reference = reference_month_for(self.ctx.clock.today(), closing_day);
        Ok(compute_period(reference, closing_day))
    }

    /// The period labelled `YYYY-MM`.
    pub async fn for_label(&self, label: &str) -> EngineResult<ClosingPeriod> {
        let reference = YearMonth::parse(label)?;
        let closing_day = self.closing_day().await?;
        Ok(compute_period(reference, closing_day))
    }
}
