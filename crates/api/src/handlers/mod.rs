pub mod auto_order;
pub mod calendar;
pub mod closing_periods;
pub mod orders;
pub mod prices;
pub mod reports;
pub mod settings;
pub mod templates;
