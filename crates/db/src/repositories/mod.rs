//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods that participate in multi-step writes accept any
//! [`sqlx::PgExecutor`], so callers pass `&pool` or `&mut *tx`.

pub mod audit_repo;
pub mod auto_order_run_repo;
pub mod calendar_repo;
pub mod menu_item_repo;
pub mod order_repo;
pub mod price_record_repo;
pub mod report_repo;
pub mod settings_repo;
pub mod template_repo;
pub mod user_repo;
pub mod weekday_default_repo;

pub use audit_repo::AuditLogRepo;
pub use auto_order_run_repo::AutoOrderRunRepo;
pub use calendar_repo::CalendarRepo;
pub use menu_item_repo::MenuItemRepo;
pub use order_repo::OrderRepo;
pub use price_record_repo::PriceRecordRepo;
pub use report_repo::ReportRepo;
pub use settings_repo::SettingsRepo;
pub use template_repo::TemplateRepo;
pub use user_repo::UserRepo;
pub use weekday_default_repo::WeekdayDefaultRepo;
