//! Domain rules for the boxed-meal ordering service.
//!
//! Everything in this crate is pure: no database, no network, no ambient
//! clock reads. Callers pass in the current time through [`clock`] so the
//! same rules run identically in the API, the worker, and tests.

pub mod audit;
pub mod auto_order;
pub mod calendar;
pub mod clock;
pub mod closing_period;
pub mod error;
pub mod ordering;
pub mod pricing;
pub mod principal;
pub mod roles;
pub mod types;
