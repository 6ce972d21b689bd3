//! Daily trigger for the auto-order batch.
//!
//! - [`config::WorkerConfig`]: environment configuration.
//! - [`schedule`]: next-fire arithmetic in the business time zone.
//! - [`scheduler::AutoOrderScheduler`]: the cancellable loop around the runner.

pub mod config;
pub mod schedule;
pub mod scheduler;
