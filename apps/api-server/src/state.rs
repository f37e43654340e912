//! Application state - shared across all handlers.

use std::sync::Arc;

use quorum_core::ports::{PostStore, Quota, RateLimiter};
use quorum_core::scoring::ScoreEngine;
use quorum_infra::InMemoryPostStore;

#[cfg(feature = "postgres")]
use quorum_infra::PostgresPostStore;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub engine: Arc<ScoreEngine>,
    pub limiter: Arc<dyn RateLimiter>,
    /// Budget applied to the vote action.
    pub vote_quota: Quota,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig, limiter: Arc<dyn RateLimiter>) -> Self {
        let posts = Self::build_store(config).await;
        let engine = Arc::new(ScoreEngine::new(posts.clone()));

        tracing::info!("Application state initialized");

        Self {
            posts,
            engine,
            limiter,
            vote_quota: config.rate_limit.vote_quota(),
        }
    }

    #[cfg(feature = "postgres")]
    async fn build_store(config: &AppConfig) -> Arc<dyn PostStore> {
        if let Some(db_config) = &config.database {
            match db_config.connect().await {
                Ok(conn) => return Arc::new(PostgresPostStore::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }
        Arc::new(InMemoryPostStore::new())
    }

    #[cfg(not(feature = "postgres"))]
    async fn build_store(_config: &AppConfig) -> Arc<dyn PostStore> {
        tracing::info!("Running without postgres feature - using in-memory store");
        Arc::new(InMemoryPostStore::new())
    }
}
