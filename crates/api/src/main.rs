use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bento_api::config::ServerConfig;
use bento_api::router::build_app_router;
use bento_api::state::AppState;
use bento_core::clock::BusinessClock;
use bento_engine::{Engine, EngineContext};
use bento_events::{AuditPersistence, EventBus};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bento_api=debug,bento_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = bento_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    bento_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    bento_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let event_bus = Arc::new(EventBus::default());
    let persistence = tokio::spawn(AuditPersistence::run(pool.clone(), event_bus.subscribe()));

    let ctx = EngineContext::new(
        pool.clone(),
        BusinessClock::system(config.business_timezone),
        event_bus,
    );
    let engine = Engine::new(ctx, config.auto_order_concurrency);

    let addr = SocketAddr::new(
        config.host.parse().context("HOST must be an IP address")?,
        config.port,
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };
    let app = build_app_router(state, &config);

    tracing::info!(%addr, timezone = %config.business_timezone, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // The router (and every bus handle it held) is gone; let the audit
    // writer drain what is left.
    if tokio::time::timeout(Duration::from_secs(5), persistence)
        .await
        .is_err()
    {
        tracing::warn!("Audit persistence did not finish within 5s");
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
