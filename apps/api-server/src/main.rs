//! # Quorum API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

#[cfg(feature = "scheduler")]
mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use quorum_core::ports::RateLimiter;
use quorum_infra::FixedWindowRateLimiter;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Quorum API Server on {}:{}",
        config.host,
        config.port
    );

    let memory_limiter = Arc::new(FixedWindowRateLimiter::new());
    let limiter = build_limiter(memory_limiter.clone()).await;

    let state = AppState::new(&config, limiter).await;

    #[cfg(feature = "scheduler")]
    let mut jobs = start_background_jobs(&config, memory_limiter).await;

    let result = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Some(jobs) = jobs.as_mut() {
        if let Err(e) = jobs.shutdown().await {
            tracing::error!("Failed to stop background jobs: {}", e);
        }
    }

    result
}

/// Prefer the Redis-backed limiter when configured, falling back to the
/// in-process window map.
async fn build_limiter(memory: Arc<FixedWindowRateLimiter>) -> Arc<dyn RateLimiter> {
    #[cfg(feature = "redis")]
    if std::env::var("REDIS_URL").is_ok() {
        match quorum_infra::RedisRateLimiter::from_env().await {
            Ok(limiter) => return Arc::new(limiter),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to Redis rate limiter: {}. Using in-memory fallback.",
                    e
                );
            }
        }
    }
    memory
}

#[cfg(feature = "scheduler")]
async fn start_background_jobs(
    config: &AppConfig,
    limiter: Arc<FixedWindowRateLimiter>,
) -> Option<background::BackgroundJobs> {
    let jobs = match background::BackgroundJobs::new(config.scheduler_enabled).await {
        Ok(jobs) => jobs,
        Err(e) => {
            tracing::error!("Failed to create scheduler: {}", e);
            return None;
        }
    };

    if config.rate_limit.sweep_enabled {
        if let Err(e) = jobs.register_limiter_sweep(limiter).await {
            tracing::error!("Failed to register rate limit sweep: {}", e);
        }
    } else {
        tracing::info!("Rate limit sweep disabled");
    }

    if let Err(e) = jobs.start().await {
        tracing::error!("Failed to start background jobs: {}", e);
        return None;
    }

    Some(jobs)
}
