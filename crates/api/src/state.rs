use std::sync::Arc;

use bento_engine::Engine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub pool: bento_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Ledgers, calendar, runner, and reporting.
    pub engine: Engine,
}
