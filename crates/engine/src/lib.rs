//! Order scheduling and pricing engine.
//!
//! Each component wraps an [`EngineContext`] (pool, business clock, audit
//! sink) and exposes the operations the HTTP layer and the worker call.
//! Every mutation takes an [`ActingPrincipal`](bento_core::principal::ActingPrincipal),
//! runs in one transaction, and records its audit entry after commit.

pub mod calendar;
pub mod context;
pub mod error;
pub mod orders;
pub mod periods;
pub mod pricing;
pub mod reports;
pub mod runner;
pub mod settings;
pub mod templates;

pub use calendar::CalendarStore;
pub use context::EngineContext;
pub use error::{EngineError, EngineResult};
pub use orders::OrderLedger;
pub use periods::ClosingPeriods;
pub use pricing::PriceLedger;
pub use reports::Reporting;
pub use runner::{AutoOrderRunner, RunOutcome};
pub use settings::SettingsService;
pub use templates::TemplateService;

/// Default number of users the batch runner processes concurrently.
pub const DEFAULT_RUN_CONCURRENCY: usize = 8;

/// All engine components, cheaply cloneable.
#[derive(Clone)]
pub struct Engine {
    pub calendar: CalendarStore,
    pub prices: PriceLedger,
    pub orders: OrderLedger,
    pub templates: TemplateService,
    pub runner: AutoOrderRunner,
    pub reports: Reporting,
    pub periods: ClosingPeriods,
    pub settings: SettingsService,
}

impl Engine {
    pub fn new(ctx: EngineContext, run_concurrency: usize) -> Self {
        let orders = OrderLedger::new(ctx.clone());
        Self {
            calendar: CalendarStore::new(ctx.clone()),
            prices: PriceLedger::new(ctx.clone()),
            runner: AutoOrderRunner::new(ctx.clone(), orders.clone(), run_concurrency),
            orders,
            templates: TemplateService::new(ctx.clone()),
            reports: Reporting::new(ctx.clone()),
            periods: ClosingPeriods::new(ctx.clone()),
            settings: SettingsService::new(ctx),
        }
    }
}
