//! Cancellable daily loop around [`AutoOrderRunner`].

use std::time::Duration;

use chrono::NaiveTime;
use tokio_util::sync::CancellationToken;
use bento_core::clock::BusinessClock;
use bento_core::principal::ActingPrincipal;
use bento_engine::{AutoOrderRunner, EngineResult, RunOutcome};

use crate::schedule::duration_until_next_run;

pub struct AutoOrderScheduler {
    runner: AutoOrderRunner,
    clock: BusinessClock,
    run_at: NaiveTime,
}

impl AutoOrderScheduler {
    pub fn new(runner: AutoOrderRunner, clock: BusinessClock, run_at: NaiveTime) -> Self {
        Self {
            runner,
            clock,
            run_at,
        }
    }

    /// Run the batch for today as the system principal.
    ///
    /// A run already recorded for today is reported, not repeated.
    pub async fn run_once(&self) -> EngineResult<RunOutcome> {
        let outcome = self.runner.run(&ActingPrincipal::system()).await?;
        match &outcome {
            RunOutcome::Completed(report) => tracing::info!(
                run_id = report.run.id,
                target_date = %report.run.target_date,
                created = report.run.created_count,
                skipped = report.run.skipped_count,
                error = report.run.error_count,
                "Scheduled auto-order run finished"
            ),
            RunOutcome::AlreadyRan(run) => tracing::info!(
                run_id = run.id,
                run_date = %run.run_date,
                "Auto-order batch already ran today"
            ),
        }
        Ok(outcome)
    }

    /// Fire once a day at `run_at` until `cancel` is triggered.
    ///
    /// When started after today's run time the batch runs immediately, so a
    /// restart never silently skips a day.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            run_at = %self.run_at,
            timezone = %self.clock.timezone(),
            "Auto-order scheduler started"
        );

        if self.clock.now_local().time() >= self.run_at {
            self.fire().await;
        }

        loop {
            let wait = self.next_wait();
            tracing::debug!(wait_secs = wait.as_secs(), "Sleeping until next auto-order run");
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Auto-order scheduler stopping");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    self.fire().await;
                }
            }
        }
    }

    fn next_wait(&self) -> Duration {
        duration_until_next_run(self.clock.now(), self.clock.timezone(), self.run_at)
    }

    async fn fire(&self) {
        if let Err(e) = self.run_once().await {
            tracing::error!(error = %e, "Scheduled auto-order run failed");
        }
    }
}
