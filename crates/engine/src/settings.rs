use serde_json::json;
use bento_core::audit::{actions, tables};
use bento_core::closing_period::validate_closing_day;
use bento_core::error::CoreError;
use bento_core::principal::ActingPrincipal;
use bento_db::models::settings::{OrderSettings, UpdateOrderSettings};
use bento_db::repositories::SettingsRepo;

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Ordering horizon and billing closing day.
#[derive(Clone)]
pub struct SettingsService {
    ctx: EngineContext,
}

impl SettingsService {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    pub async fn get(&self) -> EngineResult<OrderSettings> {
        Ok(SettingsRepo::get(&self.ctx.pool).await?)
    }

    pub async fn update(
        &self,
        principal: &ActingPrincipal,
        input: &UpdateOrderSettings,
    ) -> EngineResult<OrderSettings> {
        principal.require_admin()?;
        if input.max_days_ahead < 0 {
            return Err(CoreError::Validation(format!(
                "max_days_ahead must not be negative, got {}",
                input.max_days_ahead
            ))
            .into());
        }
        validate_closing_day(input.closing_day)?;

        let before = SettingsRepo::get(&self.ctx.pool).await?;
        let after = SettingsRepo::update(&self.ctx.pool, input).await?;
        self.ctx.audit(
            principal,
            actions::SETTINGS_UPDATE,
            tables::ORDER_SETTINGS,
            None,
            json!({
                "before": { "max_days_ahead": before.max_days_ahead, "closing_day": before.closing_day },
                "after": { "max_days_ahead": after.max_days_ahead, "closing_day": after.closing_day },
            }),
        );
        Ok(after)
    }
}
