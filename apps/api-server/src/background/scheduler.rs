//! Cron-style background jobs using tokio-cron-scheduler.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use quorum_infra::FixedWindowRateLimiter;

/// How often expired rate-limit windows are reclaimed.
const SWEEP_SCHEDULE: &str = "0 */5 * * * *";

/// Background job runner. Owns the cron scheduler; jobs only run once
/// `start` is called, and `shutdown` stops them with the host.
pub struct BackgroundJobs {
    scheduler: JobScheduler,
    enabled: bool,
}

impl BackgroundJobs {
    pub async fn new(enabled: bool) -> Result<Self, JobSchedulerError> {
        Ok(Self {
            scheduler: JobScheduler::new().await?,
            enabled,
        })
    }

    /// Register the periodic sweep of expired rate-limit windows.
    pub async fn register_limiter_sweep(
        &self,
        limiter: Arc<FixedWindowRateLimiter>,
    ) -> Result<(), JobSchedulerError> {
        let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _lock| {
            let limiter = limiter.clone();
            Box::pin(async move {
                let removed = limiter.sweep_expired().await;
                tracing::debug!(removed, "rate limit sweep finished");
            })
        })?;

        let id = self.scheduler.add(job).await?;
        tracing::info!(schedule = %SWEEP_SCHEDULE, job_id = %id, "Rate limit sweep registered");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.scheduler.start().await?;
        tracing::info!("Background jobs started");
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        tracing::info!("Background jobs stopped");
        Ok(())
    }
}
