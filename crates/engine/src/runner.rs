//! Daily auto-order batch.
//!
//! A run is keyed by the business date it executes on. Claiming that date
//! is the only guard against double triggering; per-order uniqueness covers
//! races with manual orders placed while the run is in flight. A run that
//! fails after claiming its date gives the claim back, so a later trigger
//! on the same day picks up the users it did not reach.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::json;
use bento_core::audit::{actions, tables};
use bento_core::auto_order::{
    details, find_next_orderable, select_template, RunItemResult, SCAN_HORIZON_DAYS,
};
use bento_core::error::CoreError;
use bento_core::ordering::OrderSource;
use bento_core::principal::ActingPrincipal;
use bento_core::types::DbId;
use bento_db::models::auto_order::{
    AutoOrderRun, AutoOrderRunReport, AutoOrderTemplate, NewRunItem, RunCounts,
};
use bento_db::models::user::User;
use bento_db::repositories::{AutoOrderRunRepo, CalendarRepo, OrderRepo, TemplateRepo, UserRepo};

use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};
use crate::orders::OrderLedger;

/// Result of triggering the batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed(AutoOrderRunReport),
    /// A run already exists for today; nothing was done.
    AlreadyRan(AutoOrderRun),
}

/// What happened to one user.
#[derive(Debug)]
struct UserOutcome {
    result: RunItemResult,
    detail: String,
    order_id: Option<DbId>,
}

impl UserOutcome {
    fn skipped(detail: impl Into<String>) -> Self {
        Self {
            result: RunItemResult::Skipped,
            detail: detail.into(),
            order_id: None,
        }
    }

    fn error(detail: impl Into<String>) -> Self {
        Self {
            result: RunItemResult::Error,
            detail: detail.into(),
            order_id: None,
        }
    }
}

#[derive(Clone)]
pub struct AutoOrderRunner {
    ctx: EngineContext,
    orders: OrderLedger,
    concurrency: usize,
}

impl AutoOrderRunner {
    pub fn new(ctx: EngineContext, orders: OrderLedger, concurrency: usize) -> Self {
        Self {
            ctx,
            orders,
            concurrency: concurrency.max(1),
        }
    }

    /// Execute today's run.
    pub async fn run(&self, principal: &ActingPrincipal) -> EngineResult<RunOutcome> {
        principal.require_admin()?;
        let today = self.ctx.clock.today();

        if let Some(existing) = AutoOrderRunRepo::find_by_run_date(&self.ctx.pool, today).await? {
            tracing::info!(run_id = existing.id, %today, "Auto-order run already exists for today");
            return Ok(RunOutcome::AlreadyRan(existing));
        }

        self.deactivate_departed(principal, today).await?;

        let target_date = self.next_orderable_date(today).await?;
        let Some(run) = AutoOrderRunRepo::try_start(&self.ctx.pool, today, target_date).await? else {
            let existing = AutoOrderRunRepo::find_by_run_date(&self.ctx.pool, today)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!("Run for {today} claimed but not readable"))
                })?;
            return Ok(RunOutcome::AlreadyRan(existing));
        };
        tracing::info!(run_id = run.id, %today, %target_date, "Auto-order run started");

        match self.execute(principal, &run).await {
            Ok(report) => Ok(RunOutcome::Completed(report)),
            Err(e) => {
                tracing::error!(run_id = run.id, %today, error = %e, "Auto-order run failed");
                match AutoOrderRunRepo::release(&self.ctx.pool, run.id).await {
                    Ok(true) => tracing::info!(run_id = run.id, "Released claim for failed run"),
                    Ok(false) => {}
                    Err(release_err) => tracing::error!(
                        run_id = run.id,
                        error = %release_err,
                        "Failed to release claim for failed run"
                    ),
                }
                Err(e)
            }
        }
    }

    /// Everything after the claim. An error here leaves the run unfinished.
    async fn execute(
        &self,
        principal: &ActingPrincipal,
        run: &AutoOrderRun,
    ) -> EngineResult<AutoOrderRunReport> {
        let target_date = run.target_date;
        let users = UserRepo::list_auto_order_enabled(&self.ctx.pool).await?;
        let user_ids: Vec<DbId> = users.iter().map(|u| u.id).collect();
        let mut templates: HashMap<DbId, Vec<AutoOrderTemplate>> = HashMap::new();
        for template in TemplateRepo::list_for_users(&self.ctx.pool, &user_ids).await? {
            templates.entry(template.user_id).or_default().push(template);
        }

        let counts = stream::iter(users)
            .map(|user| {
                let user_templates = templates.remove(&user.id).unwrap_or_default();
                self.process_user(run.id, user, user_templates, target_date)
            })
            .buffer_unordered(self.concurrency)
            .fold(RunCounts::default(), |mut counts, result| async move {
                match result {
                    RunItemResult::Created => counts.created += 1,
                    RunItemResult::Skipped => counts.skipped += 1,
                    RunItemResult::Error => counts.error += 1,
                }
                counts
            })
            .await;

        let run = AutoOrderRunRepo::complete(&self.ctx.pool, run.id, counts).await?;
        tracing::info!(
            run_id = run.id,
            created = counts.created,
            skipped = counts.skipped,
            error = counts.error,
            "Auto-order run completed"
        );
        self.ctx.audit(
            principal,
            actions::AUTO_ORDER_RUN,
            tables::AUTO_ORDER_RUNS,
            Some(run.id),
            json!({
                "run_date": run.run_date,
                "target_date": run.target_date,
                "created": counts.created,
                "skipped": counts.skipped,
                "error": counts.error,
            }),
        );

        let items = AutoOrderRunRepo::list_items(&self.ctx.pool, run.id).await?;
        Ok(AutoOrderRunReport { run, items })
    }

    pub async fn list_runs(
        &self,
        principal: &ActingPrincipal,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> EngineResult<Vec<AutoOrderRun>> {
        principal.require_admin()?;
        Ok(AutoOrderRunRepo::list(&self.ctx.pool, limit, offset).await?)
    }

    pub async fn get_run(
        &self,
        principal: &ActingPrincipal,
        run_id: DbId,
    ) -> EngineResult<AutoOrderRunReport> {
        principal.require_admin()?;
        let run = AutoOrderRunRepo::find_by_id(&self.ctx.pool, run_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "AutoOrderRun",
                id: run_id,
            })?;
        let items = AutoOrderRunRepo::list_items(&self.ctx.pool, run_id).await?;
        Ok(AutoOrderRunReport { run, items })
    }

    async fn deactivate_departed(
        &self,
        principal: &ActingPrincipal,
        today: NaiveDate,
    ) -> EngineResult<()> {
        let deactivated = UserRepo::deactivate_departed(&self.ctx.pool, today).await?;
        for user_id in deactivated {
            tracing::info!(user_id, %today, "Deactivated departed user");
            self.ctx.audit(
                principal,
                actions::USER_DEACTIVATE,
                tables::USERS,
                Some(user_id),
                json!({ "reason": "left_date passed", "as_of": today }),
            );
        }
        Ok(())
    }

    async fn next_orderable_date(&self, today: NaiveDate) -> EngineResult<NaiveDate> {
        let horizon_end = today
            .checked_add_days(Days::new(SCAN_HORIZON_DAYS))
            .unwrap_or(NaiveDate::MAX);
        let available = CalendarRepo::list_available_dates(&self.ctx.pool, today, horizon_end).await?;
        find_next_orderable(today, SCAN_HORIZON_DAYS, |date| available.contains(&date)).ok_or_else(
            || {
                CoreError::NotAvailable(format!(
                    "No orderable date within {SCAN_HORIZON_DAYS} days of {today}"
                ))
                .into()
            },
        )
    }

    /// Process one user and record the outcome. Recording is best-effort.
    async fn process_user(
        &self,
        run_id: DbId,
        user: User,
        templates: Vec<AutoOrderTemplate>,
        target_date: NaiveDate,
    ) -> RunItemResult {
        let outcome = match self.order_for_user(&user, &templates, target_date).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(user_id = user.id, error = %e, "Auto-order failed for user");
                UserOutcome::error(e.to_string())
            }
        };

        let item = NewRunItem {
            run_id,
            user_id: user.id,
            result: outcome.result.as_str(),
            detail: outcome.detail,
            order_id: outcome.order_id,
        };
        if let Err(e) = AutoOrderRunRepo::add_item(&self.ctx.pool, &item).await {
            tracing::warn!(run_id, user_id = user.id, error = %e, "Failed to record run item");
        }
        outcome.result
    }

    async fn order_for_user(
        &self,
        user: &User,
        templates: &[AutoOrderTemplate],
        target_date: NaiveDate,
    ) -> Result<UserOutcome, sqlx::Error> {
        if OrderRepo::find_ordered_for_day(&self.ctx.pool, user.id, target_date)
            .await?
            .is_some()
        {
            return Ok(UserOutcome::skipped(details::ALREADY_ORDERED));
        }

        let Some(template) = select_template(templates, target_date) else {
            return Ok(UserOutcome::skipped(details::NO_TEMPLATE));
        };

        let placed = self
            .orders
            .place(
                &ActingPrincipal::system(),
                user.id,
                template.menu_item_id,
                target_date,
                template.quantity,
                OrderSource::Auto,
            )
            .await;

        Ok(match placed {
            Ok(order) => UserOutcome {
                result: RunItemResult::Created,
                detail: details::CREATED.into(),
                order_id: Some(order.id),
            },
            Err(EngineError::Core(CoreError::Conflict(_))) => {
                UserOutcome::skipped(details::CONCURRENT_ORDER)
            }
            Err(EngineError::Core(CoreError::NotFound { entity: "MenuItem", .. })) => {
                UserOutcome::error(details::MENU_ITEM_UNAVAILABLE)
            }
            Err(EngineError::Core(e)) => UserOutcome::error(e.to_string()),
            Err(EngineError::Database(e)) => return Err(e),
        })
    }
}
