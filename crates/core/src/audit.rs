//! Audit action and target-table names.
//!
//! Every state change is recorded as one audit entry. Names are dotted
//! `<entity>.<verb>[.<qualifier>]` strings shared by the API, the worker,
//! and the audit persistence task.

/// Known action names for audit entries.
pub mod actions {
    pub const ORDER_CREATE: &str = "order.create";
    pub const ORDER_CREATE_ADMIN: &str = "order.create.admin";
    pub const ORDER_CREATE_AUTO: &str = "order.create.auto";
    pub const ORDER_UPDATE: &str = "order.update";
    pub const ORDER_UPDATE_ADMIN: &str = "order.update.admin";
    pub const ORDER_CANCEL: &str = "order.cancel";
    pub const ORDER_CANCEL_ADMIN: &str = "order.cancel.admin";
    pub const ORDER_DELETE_ADMIN: &str = "order.delete.admin";
    pub const ORDER_REASSIGN_ADMIN: &str = "order.reassign.admin";

    pub const CALENDAR_UPSERT: &str = "calendar.upsert";
    pub const CALENDAR_DEFAULTS_UPDATE: &str = "calendar.defaults.update";

    pub const PRICE_CREATE: &str = "price.create";
    pub const PRICE_UPDATE: &str = "price.update";
    pub const PRICE_AUTO_CLOSE: &str = "price.auto_close";

    pub const TEMPLATE_CREATE: &str = "auto_order_template.create";
    pub const TEMPLATE_UPDATE: &str = "auto_order_template.update";
    pub const TEMPLATE_DELETE: &str = "auto_order_template.delete";

    pub const AUTO_ORDER_RUN: &str = "auto_order.run";
    pub const USER_DEACTIVATE: &str = "user.deactivate";
    pub const SETTINGS_UPDATE: &str = "settings.update";
}

/// Table names used as audit targets.
pub mod tables {
    pub const ORDERS: &str = "orders";
    pub const CALENDAR_DAYS: &str = "calendar_days";
    pub const CALENDAR_WEEKDAY_DEFAULTS: &str = "calendar_weekday_defaults";
    pub const PRICE_RECORDS: &str = "price_records";
    pub const AUTO_ORDER_TEMPLATES: &str = "auto_order_templates";
    pub const AUTO_ORDER_RUNS: &str = "auto_order_runs";
    pub const USERS: &str = "users";
    pub const ORDER_SETTINGS: &str = "order_settings";
}

/// Pick the order action name for a principal kind.
pub fn order_action(base: &'static str, is_admin: bool) -> &'static str {
    match (base, is_admin) {
        (actions::ORDER_CREATE, true) => actions::ORDER_CREATE_ADMIN,
        (actions::ORDER_UPDATE, true) => actions::ORDER_UPDATE_ADMIN,
        (actions::ORDER_CANCEL, true) => actions::ORDER_CANCEL_ADMIN,
        _ => base,
    }
}
