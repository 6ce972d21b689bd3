use anyhow::Context;
use chrono_tz::Tz;
use bento_core::clock::{parse_timezone, DEFAULT_TIMEZONE};
use bento_engine::DEFAULT_RUN_CONCURRENCY;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time zone that defines "today" and order deadlines.
    pub business_timezone: Tz,
    /// Users processed concurrently by a manually triggered run.
    pub auto_order_concurrency: usize,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `HOST`                   | `0.0.0.0`               |
    /// | `PORT`                   | `3000`                  |
    /// | `CORS_ORIGINS`           | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                    |
    /// | `BUSINESS_TIMEZONE`      | `Asia/Tokyo`            |
    /// | `AUTO_ORDER_CONCURRENCY` | `8`                     |
    /// | `JWT_SECRET`             | required                |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("PORT must be a valid u16")?;

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .context("REQUEST_TIMEOUT_SECS must be a valid u64")?;

        let tz_name =
            std::env::var("BUSINESS_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.into());
        let business_timezone = parse_timezone(&tz_name)?;

        let auto_order_concurrency: usize = std::env::var("AUTO_ORDER_CONCURRENCY")
            .unwrap_or_else(|_| DEFAULT_RUN_CONCURRENCY.to_string())
            .parse()
            .context("AUTO_ORDER_CONCURRENCY must be a positive integer")?;

        let jwt = JwtConfig::from_env()?;

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            business_timezone,
            auto_order_concurrency,
            jwt,
        })
    }
}
