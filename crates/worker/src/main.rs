use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bento_core::clock::BusinessClock;
use bento_engine::{AutoOrderRunner, EngineContext, OrderLedger};
use bento_events::{AuditPersistence, EventBus};
use bento_worker::config::WorkerConfig;
use bento_worker::scheduler::AutoOrderScheduler;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bento_worker=debug,bento_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env()?;

    let pool = bento_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    bento_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    bento_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready");

    let event_bus = Arc::new(EventBus::default());
    let persistence = tokio::spawn(AuditPersistence::run(pool.clone(), event_bus.subscribe()));

    let clock = BusinessClock::system(config.business_timezone);
    let ctx = EngineContext::new(pool, clock.clone(), event_bus);
    let runner = AutoOrderRunner::new(ctx.clone(), OrderLedger::new(ctx), config.concurrency);
    let scheduler = AutoOrderScheduler::new(runner, clock, config.run_at);

    if config.run_once {
        let result = scheduler.run_once().await;
        drop(scheduler);
        result.context("Auto-order run failed")?;
    } else {
        let cancel = CancellationToken::new();
        let scheduler_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            scheduler.run(scheduler_cancel).await;
        });

        shutdown_signal().await;
        cancel.cancel();
        handle.await.context("Scheduler task panicked")?;
    }

    // The scheduler held the last bus sender; let the audit writer drain.
    if tokio::time::timeout(Duration::from_secs(5), persistence)
        .await
        .is_err()
    {
        tracing::warn!("Audit persistence did not finish within 5s");
    }
    tracing::info!("Worker stopped");
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
