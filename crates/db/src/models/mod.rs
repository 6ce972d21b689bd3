//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` entity structs matching database rows
//! - `Deserialize` (+ `Validate` where user input lands) request DTOs

pub mod audit;
pub mod auto_order;
pub mod calendar;
pub mod menu;
pub mod order;
pub mod price;
pub mod report;
pub mod settings;
pub mod user;
